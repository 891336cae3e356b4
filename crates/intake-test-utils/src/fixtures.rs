// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canned submission payloads.

use serde_json::{json, Value};

/// A payload that passes validation for `form_type`, with every declared
/// field present (optional ones included).
///
/// Panics on an unknown form type.
pub fn valid_payload(form_type: &str) -> Value {
    match form_type {
        "sales" => json!({
            "company_name": "Acme Traders",
            "mobile_number": "9876543210",
            "transaction_amount": 15000,
            "date_of_transaction": "2024-03-01",
            "contribution_to_BCN": "yes",
            "product_service_sold": "Office furniture",
            "city": "Pune",
            "buyer_name": "Ravi Kumar",
            "buyer_mobile_number": "9123456780",
            "remarks": "Repeat customer"
        }),
        "buyer" => json!({
            "name": "Anita Shah",
            "mobile_number": "9988776655",
            "city": "Mumbai",
            "service_product_description": "Accounting services",
            "transaction_date": "2024-02-15",
            "seller_name": "Ledger Co",
            "seller_mobile": "9001122334",
            "product_service_feedback": "Prompt and accurate",
            "recommendation": "yes"
        }),
        "requirement" => json!({
            "mobile_number": "9876501234",
            "name": "Suresh Patil",
            "description": "Need a caterer for 200 guests",
            "city": "Nashik",
            "urgency": "1 week",
            "specialMention": "Vegetarian only"
        }),
        "job_opening" | "jobopeningform" => json!({
            "company_name": "Brightline Labs",
            "job_title": "Backend Engineer",
            "job_description": "Build and run the intake services",
            "required_skills": "Rust, SQL",
            "salary": "12-18 LPA",
            "job_type": "full_time",
            "location": "Bengaluru",
            "application_deadline": "2024-12-31"
        }),
        other => panic!("no fixture for form type `{other}`"),
    }
}
