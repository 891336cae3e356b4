// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed views over normalized records.
//!
//! Storage and the dispatcher only deal in [`NormalizedRecord`]. This module is
//! library API for downstream consumers (reporting, exports) that want field
//! access by name and type; nothing in the service itself decodes into it.
//!
//! ```
//! use intake_forms::records::Urgency;
//! use intake_forms::{validate, FormRecord, FormType};
//! use serde_json::json;
//!
//! let payload = json!({
//!     "mobile_number": "9876501234",
//!     "name": "Suresh Patil",
//!     "description": "Need a caterer",
//!     "city": " Nashik ",
//!     "urgency": "1 week",
//! });
//! let record = validate(FormType::Requirement.schema(), &payload).unwrap();
//!
//! let FormRecord::Requirement(typed) = FormRecord::from_normalized(&record).unwrap() else {
//!     panic!("expected a requirement record");
//! };
//! assert_eq!(typed.city, "Nashik");
//! assert_eq!(typed.urgency, Urgency::OneWeek);
//! assert_eq!(typed.special_mention, "");
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use intake_core::NormalizedRecord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schema::FormType;

#[derive(Debug, Error)]
pub enum TypedRecordError {
    #[error("record has unknown form type `{0}`")]
    UnknownFormType(String),

    #[error("record does not match the `{form_type}` shape: {source}")]
    Shape {
        form_type: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YesNo {
    Yes,
    No,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Urgency {
    #[serde(rename = "1 day")]
    OneDay,
    #[serde(rename = "1 week")]
    OneWeek,
    #[serde(rename = "1 month")]
    OneMonth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub company_name: String,
    pub mobile_number: String,
    pub transaction_amount: f64,
    pub date_of_transaction: NaiveDate,
    #[serde(rename = "contribution_to_BCN")]
    pub contribution_to_bcn: YesNo,
    pub product_service_sold: String,
    pub city: String,
    pub buyer_name: String,
    pub buyer_mobile_number: String,
    pub remarks: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyerRecord {
    pub name: String,
    pub mobile_number: String,
    pub city: String,
    pub service_product_description: String,
    pub transaction_date: NaiveDate,
    pub seller_name: String,
    pub seller_mobile: String,
    pub product_service_feedback: String,
    pub recommendation: Option<YesNo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementRecord {
    pub mobile_number: String,
    pub name: String,
    pub description: String,
    pub city: String,
    pub urgency: Urgency,
    #[serde(rename = "specialMention")]
    pub special_mention: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobOpeningRecord {
    pub company_name: String,
    pub job_title: String,
    pub job_description: String,
    pub required_skills: String,
    pub salary: String,
    pub job_type: JobType,
    pub location: String,
    pub application_deadline: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// A normalized record decoded into its form's concrete shape.
#[derive(Debug, Clone, PartialEq)]
pub enum FormRecord {
    Sales(SalesRecord),
    Buyer(BuyerRecord),
    Requirement(RequirementRecord),
    JobOpening(JobOpeningRecord),
}

impl FormRecord {
    pub fn from_normalized(record: &NormalizedRecord) -> Result<Self, TypedRecordError> {
        let form_type: FormType = record
            .form_type()
            .parse()
            .map_err(|_| TypedRecordError::UnknownFormType(record.form_type().to_string()))?;

        let value = serde_json::Value::Object(record.to_json());
        let shape = |source| TypedRecordError::Shape {
            form_type: form_type.to_string(),
            source,
        };

        Ok(match form_type {
            FormType::Sales => FormRecord::Sales(serde_json::from_value(value).map_err(shape)?),
            FormType::Buyer => FormRecord::Buyer(serde_json::from_value(value).map_err(shape)?),
            FormType::Requirement => {
                FormRecord::Requirement(serde_json::from_value(value).map_err(shape)?)
            }
            FormType::JobOpening => {
                FormRecord::JobOpening(serde_json::from_value(value).map_err(shape)?)
            }
        })
    }

    pub fn form_type(&self) -> FormType {
        match self {
            FormRecord::Sales(_) => FormType::Sales,
            FormRecord::Buyer(_) => FormType::Buyer,
            FormRecord::Requirement(_) => FormType::Requirement,
            FormRecord::JobOpening(_) => FormType::JobOpening,
        }
    }
}
