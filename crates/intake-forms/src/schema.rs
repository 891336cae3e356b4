// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Declarative form schemas.
//!
//! A schema is pure data: an ordered list of field rules plus the collection
//! its records are stored in. Changing a form's rules means editing its entry
//! here, never the validator or dispatcher.

use strum::{Display, EnumIter, EnumString};

use crate::field::Constraint;

/// Allowed values for yes/no questions.
pub const YES_NO: &[&str] = &["yes", "no"];
/// Allowed values for requirement urgency.
pub const URGENCY: &[&str] = &["1 day", "1 week", "1 month"];
/// Allowed values for job type.
pub const JOB_TYPES: &[&str] = &["full_time", "part_time", "contract"];

/// One named field and the rule it must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub constraint: Constraint,
}

impl FieldSpec {
    pub const fn new(name: &'static str, constraint: Constraint) -> Self {
        Self { name, constraint }
    }

    pub const fn text(name: &'static str) -> Self {
        Self::new(name, Constraint::RequiredText { trim: false })
    }

    pub const fn trimmed_text(name: &'static str) -> Self {
        Self::new(name, Constraint::RequiredText { trim: true })
    }

    pub const fn number(name: &'static str) -> Self {
        Self::new(name, Constraint::RequiredNumber)
    }

    pub const fn date(name: &'static str) -> Self {
        Self::new(name, Constraint::RequiredDate)
    }

    pub const fn one_of(name: &'static str, allowed: &'static [&'static str]) -> Self {
        Self::new(name, Constraint::Enumerated { allowed })
    }

    pub const fn optional_one_of(name: &'static str, allowed: &'static [&'static str]) -> Self {
        Self::new(name, Constraint::OptionalEnumerated { allowed })
    }

    pub const fn optional_text(name: &'static str) -> Self {
        Self::new(
            name,
            Constraint::OptionalText {
                default: "",
                trim: false,
            },
        )
    }

    pub const fn optional_trimmed_text(name: &'static str) -> Self {
        Self::new(
            name,
            Constraint::OptionalText {
                default: "",
                trim: true,
            },
        )
    }

    pub const fn system_timestamp(name: &'static str) -> Self {
        Self::new(name, Constraint::SystemTimestamp)
    }
}

/// A complete form definition.
#[derive(Debug, PartialEq, Eq)]
pub struct FormSchema {
    /// Canonical form-type identifier used by `submit`.
    pub form_type: &'static str,
    /// Human-readable name used in responses and listings.
    pub label: &'static str,
    /// Additional identifiers that resolve to this schema.
    pub aliases: &'static [&'static str],
    /// Stable collection name; must not change across deployments.
    pub collection: &'static str,
    pub fields: &'static [FieldSpec],
}

impl FormSchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Names of the fields a submission must supply.
    pub fn required_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields
            .iter()
            .filter(|f| f.constraint.is_required())
            .map(|f| f.name)
    }
}

pub static SALES: FormSchema = FormSchema {
    form_type: "sales",
    label: "Sales",
    aliases: &[],
    collection: "form.sales",
    fields: &[
        FieldSpec::text("company_name"),
        FieldSpec::text("mobile_number"),
        FieldSpec::number("transaction_amount"),
        FieldSpec::date("date_of_transaction"),
        // The form's "Select" placeholder is deliberately absent.
        FieldSpec::one_of("contribution_to_BCN", YES_NO),
        FieldSpec::text("product_service_sold"),
        FieldSpec::text("city"),
        FieldSpec::text("buyer_name"),
        FieldSpec::text("buyer_mobile_number"),
        FieldSpec::optional_text("remarks"),
    ],
};

pub static BUYER: FormSchema = FormSchema {
    form_type: "buyer",
    label: "Buyer",
    aliases: &[],
    collection: "form.buyer",
    fields: &[
        FieldSpec::text("name"),
        FieldSpec::text("mobile_number"),
        FieldSpec::text("city"),
        FieldSpec::text("service_product_description"),
        FieldSpec::date("transaction_date"),
        FieldSpec::text("seller_name"),
        FieldSpec::text("seller_mobile"),
        FieldSpec::optional_text("product_service_feedback"),
        FieldSpec::optional_one_of("recommendation", YES_NO),
    ],
};

pub static REQUIREMENT: FormSchema = FormSchema {
    form_type: "requirement",
    label: "Requirement",
    aliases: &[],
    collection: "form.requirement",
    fields: &[
        FieldSpec::trimmed_text("mobile_number"),
        FieldSpec::trimmed_text("name"),
        FieldSpec::trimmed_text("description"),
        FieldSpec::trimmed_text("city"),
        FieldSpec::one_of("urgency", URGENCY),
        FieldSpec::optional_trimmed_text("specialMention"),
    ],
};

pub static JOB_OPENING: FormSchema = FormSchema {
    form_type: "job_opening",
    label: "Job opening form",
    aliases: &["jobopeningform"],
    collection: "form.jobopeningform",
    fields: &[
        FieldSpec::trimmed_text("company_name"),
        FieldSpec::trimmed_text("job_title"),
        FieldSpec::trimmed_text("job_description"),
        FieldSpec::trimmed_text("required_skills"),
        FieldSpec::trimmed_text("salary"),
        FieldSpec::one_of("job_type", JOB_TYPES),
        FieldSpec::trimmed_text("location"),
        FieldSpec::date("application_deadline"),
        FieldSpec::system_timestamp("created_at"),
    ],
};

/// The built-in form types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum FormType {
    Sales,
    Buyer,
    Requirement,
    JobOpening,
}

impl FormType {
    pub fn schema(self) -> &'static FormSchema {
        match self {
            FormType::Sales => &SALES,
            FormType::Buyer => &BUYER,
            FormType::Requirement => &REQUIREMENT,
            FormType::JobOpening => &JOB_OPENING,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn form_type_identifiers_match_schemas() {
        for form_type in FormType::iter() {
            assert_eq!(form_type.to_string(), form_type.schema().form_type);
            assert_eq!(FormType::from_str(form_type.schema().form_type).unwrap(), form_type);
        }
        assert_eq!(FormType::JobOpening.to_string(), "job_opening");
    }

    #[test]
    fn collections_are_stable_and_distinct() {
        let collections: Vec<&str> = FormType::iter().map(|t| t.schema().collection).collect();
        assert_eq!(
            collections,
            vec![
                "form.sales",
                "form.buyer",
                "form.requirement",
                "form.jobopeningform"
            ]
        );
        let unique: HashSet<&str> = collections.iter().copied().collect();
        assert_eq!(unique.len(), collections.len());
    }

    #[test]
    fn field_names_are_unique_within_each_schema() {
        for form_type in FormType::iter() {
            let schema = form_type.schema();
            let names: HashSet<&str> = schema.fields.iter().map(|f| f.name).collect();
            assert_eq!(names.len(), schema.fields.len(), "{}", schema.form_type);
        }
    }

    #[test]
    fn sales_bcn_contribution_excludes_placeholder() {
        let spec = SALES.field("contribution_to_BCN").unwrap();
        assert_eq!(spec.constraint, Constraint::Enumerated { allowed: YES_NO });
    }

    #[test]
    fn required_fields_skip_optional_and_system_fields() {
        let sales: Vec<&str> = SALES.required_fields().collect();
        assert_eq!(sales.len(), 9);
        assert!(!sales.contains(&"remarks"));

        let buyer: Vec<&str> = BUYER.required_fields().collect();
        assert!(!buyer.contains(&"product_service_feedback"));
        assert!(!buyer.contains(&"recommendation"));

        let jobs: Vec<&str> = JOB_OPENING.required_fields().collect();
        assert!(!jobs.contains(&"created_at"));
        assert_eq!(jobs.len(), 8);
    }
}
