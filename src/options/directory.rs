//! In-process hospital directory
//!
//! Fixed reference data standing in for a hospital information system.

use super::{OptionError, OptionProvider};
use async_trait::async_trait;
use std::collections::HashMap;

type SpecialtyKey = (String, String);
type DoctorKey = (String, String, String);

/// Reference provider backed by static tables
pub struct HospitalDirectory {
    hospitals: Vec<String>,
    specialties: HashMap<String, Vec<String>>,
    doctors: HashMap<SpecialtyKey, Vec<String>>,
    timeslots: HashMap<DoctorKey, Vec<String>>,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

impl HospitalDirectory {
    pub fn new() -> Self {
        let specialties = [
            ("Central Hospital", &["Cardiology", "Dermatology"][..]),
            ("North Hospital", &["Pediatrics", "Traumatology"][..]),
        ]
        .into_iter()
        .map(|(hospital, list)| (hospital.to_string(), owned(list)))
        .collect();

        let doctors = [
            ("Central Hospital", "Cardiology", &["Dr. Garcia", "Dr. Perez"][..]),
            ("Central Hospital", "Dermatology", &["Dr. Lopez"][..]),
            ("North Hospital", "Pediatrics", &["Dr. Ruiz"][..]),
            ("North Hospital", "Traumatology", &["Dr. Fernandez", "Dr. Ortega"][..]),
        ]
        .into_iter()
        .map(|(hospital, specialty, list)| {
            ((hospital.to_string(), specialty.to_string()), owned(list))
        })
        .collect();

        let timeslots = [
            (
                "Central Hospital",
                "Cardiology",
                "Dr. Garcia",
                &["2024-05-01 10:00", "2024-05-01 12:00"][..],
            ),
            ("Central Hospital", "Cardiology", "Dr. Perez", &["2024-05-02 09:30"][..]),
            (
                "North Hospital",
                "Pediatrics",
                "Dr. Ruiz",
                &["2024-05-03 15:00", "2024-05-04 11:00"][..],
            ),
        ]
        .into_iter()
        .map(|(hospital, specialty, doctor, list)| {
            (
                (hospital.to_string(), specialty.to_string(), doctor.to_string()),
                owned(list),
            )
        })
        .collect();

        Self {
            hospitals: owned(&["Central Hospital", "North Hospital"]),
            specialties,
            doctors,
            timeslots,
        }
    }
}

impl Default for HospitalDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OptionProvider for HospitalDirectory {
    async fn hospitals(&self) -> Result<Vec<String>, OptionError> {
        Ok(self.hospitals.clone())
    }

    async fn specialties(&self, hospital: &str) -> Result<Vec<String>, OptionError> {
        Ok(self.specialties.get(hospital).cloned().unwrap_or_default())
    }

    async fn doctors(&self, hospital: &str, specialty: &str) -> Result<Vec<String>, OptionError> {
        let key = (hospital.to_string(), specialty.to_string());
        Ok(self.doctors.get(&key).cloned().unwrap_or_default())
    }

    async fn timeslots(
        &self,
        hospital: &str,
        specialty: &str,
        doctor: &str,
    ) -> Result<Vec<String>, OptionError> {
        let key = (hospital.to_string(), specialty.to_string(), doctor.to_string());
        Ok(self.timeslots.get(&key).cloned().unwrap_or_default())
    }
}
