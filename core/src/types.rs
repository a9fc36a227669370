//! Request objects and wire DTOs for the Realtycloud API.
//!
//! # Design
//! `RealtyObject` and `RealtyOwner` can only be obtained through their
//! validating constructors and expose no setters, so an invalid value never
//! reaches a payload. Owners are a closed sum of two variants; the loosely
//! typed `OwnerFields` path exists for callers holding the flat form and is
//! the only place an unknown owner type can be reported.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::ValidationError;
use crate::validate::{
    normalize_region, parse_birthday, validate_address, validate_object_key, validate_owner_individual,
    validate_owner_legal,
};

/// Billable products accepted by the order endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Product {
    EgrnObject,
    EgrnObjectFast,
    EgrnRightList,
    EgrnRightListFast,
    RiskAssessmentV2,
    RiskAssessmentFastV2,
}

impl Product {
    pub fn object(priority: bool) -> Self {
        if priority {
            Product::EgrnObjectFast
        } else {
            Product::EgrnObject
        }
    }

    pub fn right_list(priority: bool) -> Self {
        if priority {
            Product::EgrnRightListFast
        } else {
            Product::EgrnRightList
        }
    }

    pub fn risk_assessment(priority: bool) -> Self {
        if priority {
            Product::RiskAssessmentFastV2
        } else {
            Product::RiskAssessmentV2
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Product::EgrnObject => "EgrnObject",
            Product::EgrnObjectFast => "EgrnObjectFast",
            Product::EgrnRightList => "EgrnRightList",
            Product::EgrnRightListFast => "EgrnRightListFast",
            Product::RiskAssessmentV2 => "RiskAssessmentV2",
            Product::RiskAssessmentFastV2 => "RiskAssessmentFastV2",
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Product {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A real-estate object identified by its cadastral number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RealtyObject {
    key: String,
    address: String,
}

impl RealtyObject {
    /// Validates the key first, then the address.
    pub fn new(key: &str, address: &str) -> Result<Self, ValidationError> {
        validate_object_key(key)?;
        validate_address(address)?;
        Ok(Self {
            key: key.to_string(),
            address: address.to_string(),
        })
    }

    pub fn with_key(key: &str) -> Result<Self, ValidationError> {
        Self::new(key, "")
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn to_payload(&self, product: Product) -> OrderItem {
        OrderItem {
            product_name: product,
            object_key: self.key.clone(),
            object_address: self.address.clone(),
            metadata: None,
        }
    }
}

/// One entry of `order_items` in an order request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderItem {
    pub product_name: Product,
    pub object_key: String,
    pub object_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<OrderMetadata>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderMetadata {
    #[serde(rename = "ownersData")]
    pub owners_data: Vec<OwnerPayload>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct OrderRequest<'a> {
    pub order_items: &'a [OrderItem],
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct StatusRequest<'a> {
    pub order_item_ids: &'a [String],
    pub offset: u32,
    pub limit: u32,
}

/// Owner discriminant as sent on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerType {
    Individual,
    Legal,
}

impl OwnerType {
    pub fn code(&self) -> u8 {
        match self {
            OwnerType::Individual => 0,
            OwnerType::Legal => 1,
        }
    }
}

impl TryFrom<i64> for OwnerType {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(OwnerType::Individual),
            1 => Ok(OwnerType::Legal),
            other => Err(ValidationError::UnknownOwnerType { value: Some(other) }),
        }
    }
}

impl Serialize for OwnerType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// Input data for a private person. Empty optional strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndividualOwner {
    pub last_name: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub passport: Option<String>,
    /// `DD.MM.YYYY`
    pub birthday: Option<String>,
    pub region: Option<String>,
    pub inn: Option<String>,
}

/// Input data for a legal entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegalOwner {
    pub company_name: String,
    pub inn: String,
    pub region: String,
    pub registration_number: Option<String>,
}

/// Flat owner form with an explicit numeric discriminant (0 individual, 1 legal).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OwnerFields {
    pub owner_type: Option<i64>,
    pub last_name: String,
    pub first_name: String,
    pub middle_name: String,
    pub passport: String,
    pub birthday: String,
    pub region: String,
    pub inn: String,
    pub company_name: String,
    pub registration_number: String,
}

/// A validated property owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RealtyOwner(Owner);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Owner {
    Individual {
        data: IndividualOwner,
        birthday: Option<NaiveDate>,
    },
    Legal(LegalOwner),
}

impl RealtyOwner {
    pub fn individual(mut data: IndividualOwner) -> Result<Self, ValidationError> {
        if let Some(region) = data.region.as_mut() {
            normalize_region(region);
        }
        validate_owner_individual(&data)?;
        let birthday = match data.birthday.as_deref().filter(|b| !b.is_empty()) {
            Some(raw) => Some(parse_birthday(raw)?),
            None => None,
        };
        Ok(Self(Owner::Individual { data, birthday }))
    }

    pub fn legal(mut data: LegalOwner) -> Result<Self, ValidationError> {
        normalize_region(&mut data.region);
        validate_owner_legal(&data)?;
        Ok(Self(Owner::Legal(data)))
    }

    pub fn owner_type(&self) -> OwnerType {
        match &self.0 {
            Owner::Individual { .. } => OwnerType::Individual,
            Owner::Legal(_) => OwnerType::Legal,
        }
    }

    pub fn as_individual(&self) -> Option<&IndividualOwner> {
        match &self.0 {
            Owner::Individual { data, .. } => Some(data),
            Owner::Legal(_) => None,
        }
    }

    pub fn as_legal(&self) -> Option<&LegalOwner> {
        match &self.0 {
            Owner::Legal(data) => Some(data),
            Owner::Individual { .. } => None,
        }
    }

    pub fn to_payload(&self) -> OwnerPayload {
        match &self.0 {
            Owner::Individual { data, birthday } => OwnerPayload {
                owner_type: OwnerType::Individual,
                first: data.first_name.clone(),
                surname: data.last_name.clone(),
                patronymic: data.middle_name.clone().unwrap_or_default(),
                passport: data.passport.clone().unwrap_or_default(),
                birthday: birthday
                    .map(|date| date.format("%Y-%m-%dT00:01:00.0Z").to_string())
                    .unwrap_or_default(),
                region: data.region.clone().unwrap_or_default(),
                inn: data.inn.clone().unwrap_or_default(),
                company_name: String::new(),
                registration_number: String::new(),
            },
            Owner::Legal(data) => OwnerPayload {
                owner_type: OwnerType::Legal,
                first: String::new(),
                surname: String::new(),
                patronymic: String::new(),
                passport: String::new(),
                birthday: String::new(),
                region: data.region.clone(),
                inn: data.inn.clone(),
                company_name: data.company_name.clone(),
                registration_number: data.registration_number.clone().unwrap_or_default(),
            },
        }
    }
}

impl TryFrom<OwnerFields> for RealtyOwner {
    type Error = ValidationError;

    fn try_from(fields: OwnerFields) -> Result<Self, Self::Error> {
        let owner_type = fields
            .owner_type
            .ok_or(ValidationError::UnknownOwnerType { value: None })
            .and_then(OwnerType::try_from)?;
        let optional = |value: String| Some(value).filter(|v| !v.is_empty());
        match owner_type {
            OwnerType::Individual => RealtyOwner::individual(IndividualOwner {
                last_name: fields.last_name,
                first_name: fields.first_name,
                middle_name: optional(fields.middle_name),
                passport: optional(fields.passport),
                birthday: optional(fields.birthday),
                region: optional(fields.region),
                inn: optional(fields.inn),
            }),
            OwnerType::Legal => RealtyOwner::legal(LegalOwner {
                company_name: fields.company_name,
                inn: fields.inn,
                region: fields.region,
                registration_number: optional(fields.registration_number),
            }),
        }
    }
}

/// Owner entry of `metadata.ownersData`. Absent values are sent as `""`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnerPayload {
    pub owner_type: OwnerType,
    pub first: String,
    pub surname: String,
    pub patronymic: String,
    pub passport: String,
    pub birthday: String,
    pub region: String,
    pub inn: String,
    pub company_name: String,
    pub registration_number: String,
}

/// One search result with stable field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub object_type: Option<serde_json::Value>,
    pub number: Option<serde_json::Value>,
    pub address: Option<serde_json::Value>,
    pub area: Option<serde_json::Value>,
    pub cadastral_price: Option<serde_json::Value>,
    pub status: Option<serde_json::Value>,
}

/// Search result as returned by the API.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawSuggestion {
    #[serde(rename = "ObjectType")]
    object_type: Option<serde_json::Value>,
    #[serde(rename = "Number")]
    number: Option<serde_json::Value>,
    #[serde(rename = "Address")]
    address: Option<serde_json::Value>,
    #[serde(rename = "Area")]
    area: Option<serde_json::Value>,
    #[serde(rename = "kad_price")]
    cadastral_price: Option<serde_json::Value>,
    #[serde(rename = "Status")]
    status: Option<serde_json::Value>,
}

impl From<RawSuggestion> for Suggestion {
    fn from(raw: RawSuggestion) -> Self {
        Self {
            object_type: raw.object_type,
            number: raw.number,
            address: raw.address,
            area: raw.area,
            cadastral_price: raw.cadastral_price,
            status: raw.status,
        }
    }
}
