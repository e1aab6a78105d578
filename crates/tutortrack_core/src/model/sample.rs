//! Sample records used to seed a first run.

use crate::collection::address_book::AddressBook;
use crate::collection::CollectionError;
use crate::model::fields::{Email, Name, Phone, Remark, StudentId, ValidationError};
use crate::model::student::Student;
use std::error::Error;
use std::fmt::{Display, Formatter};

const SAMPLE_STUDENTS: &[(&str, &str, &str, &str)] = &[
    ("A0001", "Alex Yeoh", "87438807", "alexyeoh@example.com"),
    ("A0002", "Bernice Yu", "99272758", "berniceyu@example.com"),
    ("A0003", "Charlotte Oliveiro", "93210283", "charlotte@example.com"),
    ("A0004", "David Li", "91031282", "lidavid@example.com"),
    ("A0005", "Irfan Ibrahim", "92492021", "irfan@example.com"),
    ("A0006", "Roy Balakrishnan", "92624417", "royb@example.com"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleDataError {
    Invalid(ValidationError),
    Collection(CollectionError),
}

impl Display for SampleDataError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(err) => write!(f, "invalid sample student: {err}"),
            Self::Collection(err) => write!(f, "invalid sample address book: {err}"),
        }
    }
}

impl Error for SampleDataError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            Self::Collection(err) => Some(err),
        }
    }
}

impl From<ValidationError> for SampleDataError {
    fn from(value: ValidationError) -> Self {
        Self::Invalid(value)
    }
}

impl From<CollectionError> for SampleDataError {
    fn from(value: CollectionError) -> Self {
        Self::Collection(value)
    }
}

pub fn sample_students() -> Result<Vec<Student>, SampleDataError> {
    SAMPLE_STUDENTS
        .iter()
        .map(|(id, name, phone, email)| {
            Ok(Student {
                student_id: StudentId::parse(id)?,
                name: Name::parse(name)?,
                phone: Phone::parse(phone)?,
                email: Email::parse(email)?,
                tutorial_class: None,
                remark: Remark::default(),
            })
        })
        .collect()
}

pub fn sample_address_book() -> Result<AddressBook, SampleDataError> {
    Ok(AddressBook::from_students(sample_students()?)?)
}

#[cfg(test)]
mod tests {
    use super::{sample_address_book, SAMPLE_STUDENTS};

    #[test]
    fn every_sample_row_is_kept() {
        let book = sample_address_book().unwrap();
        assert_eq!(book.len(), SAMPLE_STUDENTS.len());
    }
}
