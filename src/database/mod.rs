use mongodb::{Client, Collection, Database};
use std::error::Error;

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;

        // Extract database name from URI or use default
        let db_name = uri
            .split('/')
            .last()
            .and_then(|s| s.split('?').next())
            .filter(|s| !s.is_empty())
            .unwrap_or("ProfileService");

        let db = client.database(db_name);

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { db };

        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Creates necessary indexes. The unique indexes on profiles/users
    /// back the duplicate-key → 400 contract.
    async fn ensure_indexes(&self) -> Result<(), Box<dyn Error>> {
        use mongodb::bson::doc;
        use mongodb::options::IndexOptions;
        use mongodb::IndexModel;

        log::info!("🔧 Creating database indexes...");

        let unique = IndexOptions::builder().unique(true).build();

        let users = self.db.collection::<mongodb::bson::Document>("users");
        let user_email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(unique.clone())
            .build();
        match users.create_index(user_email_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(email) unique"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        let profiles = self.db.collection::<mongodb::bson::Document>("profiles");
        for (field, opts) in [("user_id", unique.clone()), ("email", unique.clone())] {
            let index = IndexModel::builder()
                .keys(doc! { field: 1 })
                .options(opts)
                .build();
            match profiles.create_index(index).await {
                Ok(_) => log::info!("   ✅ Index created: profiles({}) unique", field),
                Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
            }
        }

        let files = self.db.collection::<mongodb::bson::Document>("files");
        let files_index = IndexModel::builder()
            .keys(doc! { "profile_id": 1 })
            .build();
        match files.create_index(files_index).await {
            Ok(_) => log::info!("   ✅ Index created: files(profile_id)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        let plans = self.db.collection::<mongodb::bson::Document>("plans");
        let plans_index = IndexModel::builder()
            .keys(doc! { "profile_id": 1, "skill_id": 1 })
            .build();
        match plans.create_index(plans_index).await {
            Ok(_) => log::info!("   ✅ Index created: plans(profile_id, skill_id)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }
}
