//! Static reference data: health schemes and the hospital directory.

mod hospitals;
mod schemes;

use crate::models::{HealthScheme, Hospital, HospitalType, SchemeCategory};

pub fn health_schemes() -> &'static [HealthScheme] {
    &schemes::HEALTH_SCHEMES
}

/// Schemes tagged with a category, in directory order.
pub fn schemes_in(category: SchemeCategory) -> impl Iterator<Item = &'static HealthScheme> {
    health_schemes().iter().filter(move |s| s.category == category)
}

pub fn scheme(id: &str) -> Option<&'static HealthScheme> {
    health_schemes().iter().find(|s| s.id == id)
}

pub fn hospitals() -> &'static [Hospital] {
    &hospitals::HOSPITALS
}

pub fn hospitals_of_type(hospital_type: HospitalType) -> impl Iterator<Item = &'static Hospital> {
    hospitals().iter().filter(move |h| h.hospital_type == hospital_type)
}

pub fn hospital(id: &str) -> Option<&'static Hospital> {
    hospitals().iter().find(|h| h.id == id)
}
