pub const OTHER_PLACE_OF_SERVICE: &str = "99";

/// CMS place of service codes keyed by the label used on claim rows.
pub static PLACE_OF_SERVICE_CODES: &[(&str, &str)] = &[
    ("Office", "11"),
    ("Home", "12"),
    ("Mobile Unit", "15"),
    ("Temporary Lodging", "16"),
    ("Walk-in Retail Health Clinic", "17"),
    ("Place of Employment", "18"),
    ("Inpatient Hospital", "21"),
    ("Outpatient Hospital", "22"),
    ("Emergency Room - Hospital", "23"),
    ("Ambulatory Surgical Center", "24"),
    ("Birthing Center", "25"),
    ("Military Treatment Facility", "26"),
    ("Skilled Nursing Facility", "31"),
    ("Nursing Facility", "32"),
    ("Hospice", "34"),
    ("Ambulance - Land", "41"),
    ("Ambulance - Air or Water", "42"),
    ("Independent Clinic", "49"),
    ("Federally Qualified Health Center", "50"),
    ("Inpatient Psychiatric Facility", "51"),
    ("Psychiatric Facility Partial Hospitalization", "52"),
    ("Community Mental Health Center", "53"),
    ("Intermediate Care Facility", "54"),
    ("Residential Substance Abuse Treatment Facility", "55"),
    ("Psychiatric Residential Treatment Center", "56"),
    ("Non-residential Substance Abuse Facility", "57"),
    ("Mass Immunization Center", "60"),
    ("Comprehensive Inpatient Rehabilitation", "61"),
    ("Comprehensive Outpatient Rehabilitation", "62"),
    ("End-Stage Renal Disease Treatment Facility", "65"),
    ("Public Health Clinic", "71"),
    ("Rural Health Clinic", "72"),
    ("Independent Laboratory", "81"),
    ("Other Place of Service", OTHER_PLACE_OF_SERVICE),
];

/// Exact-match lookup; unknown labels fall back to "Other Place of Service".
pub fn place_of_service_code(label: &str) -> &'static str {
    PLACE_OF_SERVICE_CODES
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, code)| *code)
        .unwrap_or(OTHER_PLACE_OF_SERVICE)
}
