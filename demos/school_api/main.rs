//! School API Example
//!
//! Serves a small seeded school over the generic resource routes.
//!
//! ```text
//! GET /subjects?fields=name&expand=grades
//! GET /grades?expand=sections.homeroom_teacher&fields=grade,sections.section
//! GET /teachers?fields=all&expand=subjects
//! ```

use schoolyard::prelude::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/demos/school_api/config/schema.yaml"
    );
    let schema = SchemaConfig::from_yaml_file(config_path)?;

    let records = Arc::new(InMemoryRecordService::new());
    populate_test_data(records.as_ref()).await?;

    println!("🚀 Starting schoolyard");
    for (type_name, plural) in schema.resources() {
        println!("    GET    /{:<16} - List {} records", plural, type_name);
    }
    println!("\n  Try:");
    println!("    GET    /subjects?fields=name&expand=grades");
    println!("    GET    /grades?fields=grade,sections.section&expand=sections.homeroom_teacher");

    ServerBuilder::new()
        .with_shared_record_service(records)
        .with_schema(schema)
        .serve("127.0.0.1:3000")
        .await
}

/// Populate the store with hydrated school records
async fn populate_test_data(records: &InMemoryRecordService) -> Result<()> {
    let year = json!({
        "id": Uuid::new_v4().to_string(),
        "year": "2025/2026",
        "start_date": "2025-09-08",
        "end_date": "2026-06-26",
        "status": "active"
    });

    let teacher = json!({
        "id": Uuid::new_v4().to_string(),
        "first_name": "Abebe",
        "last_name": "Kebede",
        "email": "abebe.kebede@school.example",
        "phone": "+251911000000"
    });

    let students = vec![
        json!({
            "id": Uuid::new_v4().to_string(),
            "student_number": "S-0001",
            "first_name": "Hana",
            "last_name": "Tesfaye",
            "date_of_birth": "2011-02-14",
            "gender": "F"
        }),
        json!({
            "id": Uuid::new_v4().to_string(),
            "student_number": "S-0002",
            "first_name": "Dawit",
            "last_name": "Alemu",
            "date_of_birth": "2010-11-03",
            "gender": "M"
        }),
    ];

    let section = json!({
        "id": Uuid::new_v4().to_string(),
        "section": "A",
        "capacity": 40,
        "homeroom_teacher": teacher,
        "students": students
    });

    let grade = json!({
        "id": Uuid::new_v4().to_string(),
        "grade": "Grade 9",
        "level": 9,
        "has_stream": false,
        "academic_year": year,
        "sections": [section]
    });

    let subject = json!({
        "id": Uuid::new_v4().to_string(),
        "name": "Mathematics",
        "code": "MATH-9",
        "grades": [grade],
        "teachers": [teacher]
    });

    let mut year_record = year.clone();
    year_record["grades"] = json!([grade]);

    records.create("academic_year", year_record).await?;
    records.create("grade", grade).await?;
    records.create("section", section).await?;
    records.create("subject", subject).await?;
    records.create("teacher", teacher).await?;
    for student in students {
        records.create("student", student).await?;
    }

    Ok(())
}
