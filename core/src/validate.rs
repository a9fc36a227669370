//! Syntactic checks for object keys, addresses and owner data.
//!
//! Every check is pure: it inspects its input and either accepts it or
//! names the rule that was broken. The only rewrite the API expects, padding
//! a one-digit region to two digits, lives in `normalize_region` and runs
//! before validation.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::error::ValidationError;
use crate::settings::{
    BIRTHDAY_FORMAT, BIRTHDAY_PATTERN, COMPANY_NAME_MAX_LENGTH, INN_LENGTH_INDIVIDUAL, INN_LENGTH_LEGAL, MAX_ADDRESS_LENGTH,
    OBJECT_KEY_PATTERN, PASSPORT_LENGTH, PERSON_NAME_PATTERN, REGION_MAX_LENGTH, REGISTRATION_NUMBER_MAX_LENGTH,
};
use crate::types::{IndividualOwner, LegalOwner};

static OBJECT_KEY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(OBJECT_KEY_PATTERN).unwrap());
static PERSON_NAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(PERSON_NAME_PATTERN).unwrap());
static BIRTHDAY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(BIRTHDAY_PATTERN).unwrap());

pub fn validate_object_key(key: &str) -> Result<(), ValidationError> {
    if OBJECT_KEY_RE.is_match(key) {
        Ok(())
    } else {
        Err(ValidationError::ObjectKey {
            key: key.to_string(),
            pattern: OBJECT_KEY_PATTERN,
        })
    }
}

pub fn validate_address(address: &str) -> Result<(), ValidationError> {
    let len = address.chars().count();
    if len > MAX_ADDRESS_LENGTH {
        return Err(ValidationError::AddressTooLong {
            len,
            max: MAX_ADDRESS_LENGTH,
        });
    }
    Ok(())
}

/// Pad a single-character region code with a leading zero: `"5"` becomes `"05"`.
pub fn normalize_region(region: &mut String) {
    if region.chars().count() == 1 {
        region.insert(0, '0');
    }
}

/// Parse a `DD.MM.YYYY` birthday. The year must have exactly four digits.
pub fn parse_birthday(value: &str) -> Result<NaiveDate, ValidationError> {
    let invalid = || ValidationError::Birthday {
        value: value.to_string(),
    };
    // chrono alone accepts short or signed years and leading whitespace.
    if !BIRTHDAY_RE.is_match(value) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(value, BIRTHDAY_FORMAT).map_err(|_| invalid())
}

pub fn validate_owner_individual(owner: &IndividualOwner) -> Result<(), ValidationError> {
    require(&owner.last_name, "last name")?;
    require(&owner.first_name, "first name")?;
    check_person_name(&owner.last_name, "last name")?;
    check_person_name(&owner.first_name, "first name")?;
    if let Some(middle_name) = present(&owner.middle_name) {
        check_person_name(middle_name, "middle name")?;
    }
    if let Some(passport) = present(&owner.passport) {
        if !is_digits(passport, PASSPORT_LENGTH..=PASSPORT_LENGTH) {
            return Err(ValidationError::Passport { len: PASSPORT_LENGTH });
        }
    }
    if let Some(birthday) = present(&owner.birthday) {
        parse_birthday(birthday)?;
    }
    if let Some(region) = present(&owner.region) {
        check_region(region)?;
    }
    if let Some(inn) = present(&owner.inn) {
        check_inn(inn, INN_LENGTH_INDIVIDUAL)?;
    }
    Ok(())
}

pub fn validate_owner_legal(owner: &LegalOwner) -> Result<(), ValidationError> {
    require(&owner.company_name, "company name")?;
    require(&owner.inn, "INN")?;
    require(&owner.region, "region")?;

    let len = owner.company_name.chars().count();
    if len > COMPANY_NAME_MAX_LENGTH {
        return Err(ValidationError::CompanyNameTooLong {
            len,
            max: COMPANY_NAME_MAX_LENGTH,
        });
    }
    check_inn(&owner.inn, INN_LENGTH_LEGAL)?;
    check_region(&owner.region)?;
    if let Some(number) = present(&owner.registration_number) {
        let len = number.chars().count();
        if len > REGISTRATION_NUMBER_MAX_LENGTH {
            return Err(ValidationError::RegistrationNumberTooLong {
                len,
                max: REGISTRATION_NUMBER_MAX_LENGTH,
            });
        }
    }
    Ok(())
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn require(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField { field });
    }
    Ok(())
}

fn check_person_name(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if !PERSON_NAME_RE.is_match(value) {
        return Err(ValidationError::PersonName { field });
    }
    Ok(())
}

fn check_region(region: &str) -> Result<(), ValidationError> {
    if !is_digits(region, 1..=REGION_MAX_LENGTH) {
        return Err(ValidationError::Region { max: REGION_MAX_LENGTH });
    }
    Ok(())
}

fn check_inn(inn: &str, len: usize) -> Result<(), ValidationError> {
    if !is_digits(inn, len..=len) {
        return Err(ValidationError::Inn { len });
    }
    Ok(())
}

fn is_digits(value: &str, len: std::ops::RangeInclusive<usize>) -> bool {
    len.contains(&value.len()) && value.bytes().all(|b| b.is_ascii_digit())
}
