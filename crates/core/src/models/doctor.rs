use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{CareError, CareResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub name: String,
    pub specialization: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub experience_years: Option<i32>,
    pub qualifications: Option<String>,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateDoctorRequest {
    pub name: String,
    pub specialization: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub experience_years: Option<i32>,
    pub qualifications: Option<String>,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn default_available() -> bool {
    true
}

impl CreateDoctorRequest {
    pub fn validate(&self) -> CareResult<()> {
        validate_profile(Some(&self.name), Some(&self.specialization), self.experience_years)
    }
}

/// Changes to a doctor's profile. Fields left out keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateDoctorRequest {
    pub name: Option<String>,
    pub specialization: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub experience_years: Option<i32>,
    pub qualifications: Option<String>,
    pub is_available: Option<bool>,
}

impl UpdateDoctorRequest {
    pub fn validate(&self) -> CareResult<()> {
        validate_profile(
            self.name.as_deref(),
            self.specialization.as_deref(),
            self.experience_years,
        )
    }

    /// Copies every field that is set onto `doctor`.
    pub fn apply(self, doctor: &mut Doctor) {
        if let Some(name) = self.name {
            doctor.name = name;
        }
        if let Some(specialization) = self.specialization {
            doctor.specialization = specialization;
        }
        if let Some(email) = self.email {
            doctor.email = Some(email);
        }
        if let Some(phone) = self.phone {
            doctor.phone = Some(phone);
        }
        if let Some(years) = self.experience_years {
            doctor.experience_years = Some(years);
        }
        if let Some(qualifications) = self.qualifications {
            doctor.qualifications = Some(qualifications);
        }
        if let Some(available) = self.is_available {
            doctor.is_available = available;
        }
    }
}

fn validate_profile(
    name: Option<&str>,
    specialization: Option<&str>,
    experience_years: Option<i32>,
) -> CareResult<()> {
    if matches!(name, Some(name) if name.trim().is_empty()) {
        return Err(CareError::InvalidInput("Doctor name must not be empty".to_string()));
    }
    if matches!(specialization, Some(s) if s.trim().is_empty()) {
        return Err(CareError::InvalidInput(
            "Doctor specialization must not be empty".to_string(),
        ));
    }
    if matches!(experience_years, Some(years) if years < 0) {
        return Err(CareError::InvalidInput(
            "Experience must not be negative".to_string(),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListDoctorsResponse {
    pub doctors: Vec<Doctor>,
}
