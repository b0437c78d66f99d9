use crate::database::MongoDB;
use crate::models::{
    file_type, gender, skill_type, status, Designation, Lookup, Skill,
};
use mongodb::bson::{doc, DateTime as BsonDateTime};

/// Seed the static id→name lookup tables. Skipped when the collection
/// already holds the expected number of entries.
pub async fn seed_lookups(db: &MongoDB) {
    let collection = db.collection::<Lookup>("lookups");

    let tables: &[(&str, &[(i32, &str)])] = &[
        ("status", status::TABLE),
        ("gender", gender::TABLE),
        ("file_type", file_type::TABLE),
        ("skill_type", skill_type::TABLE),
    ];

    let expected: usize = tables.iter().map(|(_, t)| t.len()).sum();

    let count = collection
        .count_documents(doc! {})
        .await
        .unwrap_or(0);

    if count >= expected as u64 {
        log::info!("📋 Lookups: {} entries already in DB — skipping seed", count);
        return;
    }

    if count > 0 {
        log::info!("📋 Lookups: found {} entries (expected {}) — recreating...", count, expected);
        let _ = collection.delete_many(doc! {}).await;
    }

    let entries: Vec<Lookup> = tables
        .iter()
        .flat_map(|(table, rows)| {
            rows.iter().map(|(id, name)| Lookup {
                table: table.to_string(),
                entry_id: *id,
                name: name.to_string(),
            })
        })
        .collect();

    match collection.insert_many(&entries).await {
        Ok(result) => {
            log::info!("   ✅ Inserted {} lookup entries", result.inserted_ids.len());
        }
        Err(e) => {
            log::error!("   ❌ Failed to seed lookups: {}", e);
        }
    }
}

/// Starter master designations, inserted only into an empty collection.
pub async fn seed_designations(db: &MongoDB) {
    let collection = db.collection::<Designation>("designations");

    let count = collection.count_documents(doc! {}).await.unwrap_or(0);
    if count > 0 {
        log::info!("📋 Designations: {} already in DB — skipping seed", count);
        return;
    }

    let titles = [
        "Software Engineer",
        "Senior Software Engineer",
        "Team Lead",
        "Engineering Manager",
        "QA Engineer",
        "Product Manager",
    ];

    let designations: Vec<Designation> = titles
        .iter()
        .enumerate()
        .map(|(i, title)| Designation {
            _id: None,
            designation_id: i as i32 + 1,
            title: title.to_string(),
            created_at: Some(BsonDateTime::now()),
        })
        .collect();

    match collection.insert_many(&designations).await {
        Ok(result) => {
            log::info!("   ✅ Inserted {} default designations", result.inserted_ids.len());
        }
        Err(e) => {
            log::error!("   ❌ Failed to seed designations: {}", e);
        }
    }
}

/// Starter master skills, inserted only into an empty collection.
pub async fn seed_skills(db: &MongoDB) {
    let collection = db.collection::<Skill>("skills");

    let count = collection.count_documents(doc! {}).await.unwrap_or(0);
    if count > 0 {
        log::info!("📋 Skills: {} already in DB — skipping seed", count);
        return;
    }

    let rows: &[(&str, i32, &[&str])] = &[
        ("Rust", skill_type::CORE, &["backend"]),
        ("Python", skill_type::CORE, &["backend"]),
        ("TypeScript", skill_type::CORE, &["frontend"]),
        ("MongoDB", skill_type::CORE, &["database"]),
        ("Kubernetes", skill_type::CORE, &["devops"]),
        ("Communication", skill_type::SOFT, &[]),
        ("Mentoring", skill_type::SOFT, &[]),
    ];

    let skills: Vec<Skill> = rows
        .iter()
        .enumerate()
        .map(|(i, (name, kind, categories))| Skill {
            _id: None,
            skill_id: i as i32 + 1,
            name: name.to_string(),
            skill_type: *kind,
            categories: categories.iter().map(|c| c.to_string()).collect(),
            created_at: Some(BsonDateTime::now()),
        })
        .collect();

    match collection.insert_many(&skills).await {
        Ok(result) => {
            log::info!("   ✅ Inserted {} default skills", result.inserted_ids.len());
        }
        Err(e) => {
            log::error!("   ❌ Failed to seed skills: {}", e);
        }
    }
}
