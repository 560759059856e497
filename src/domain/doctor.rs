use serde::Serialize;

/// Normalized output row. Column order matches the declaration order here;
/// every field defaults to an empty string, never null.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct DoctorRecord {
    pub title: String,
    pub forename: String,
    pub surname: String,
    pub full_address: String,
    pub institution: String,
    pub department: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postcode: String,
    pub country: String,
    pub specialty: String,
    pub reg_number: String,
    pub tel_1: String,
    pub tel_2: String,
    pub tel_3: String,
    pub fax_1: String,
    pub fax_2: String,
    pub fax_3: String,
    pub mobile: String,
    pub email_1: String,
    pub email_2: String,
    pub language: String,
    pub gender: String,
    pub workplace: String,
    pub website: String,
    pub source_result_url: String,
}
