#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use relatedcontactingroup::{ContactSearch, DatabaseLookups, SearchSettings, router};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr};
use sea_orm_migration::prelude::*;
use serde_json::{Map, Value};

pub const MEMBERS: i64 = 10;
pub const BOARD: i64 = 20;
pub const VOLUNTEERS: i64 = 30;
pub const ARCHIVE: i64 = 40;

pub const EMPLOYEE_OF: i64 = 1;
pub const SPOUSE_OF: i64 = 2;
pub const CHILD_OF: i64 = 3;

pub const ALICE: i64 = 1;
pub const BOB: i64 = 2;
pub const CAROL: i64 = 3;
pub const DAVE: i64 = 4;
pub const EVE: i64 = 5;
pub const FRANK: i64 = 6;
pub const GRACE: i64 = 7;
pub const HEIDI: i64 = 8;
pub const IVAN: i64 = 9;
pub const JUDY: i64 = 10;
pub const MALLORY: i64 = 11;
pub const NIAJ: i64 = 12;
pub const OLIVIA: i64 = 13;

/// Log to the test output, filtered by `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    init_tracing();
    let db = Database::connect("sqlite::memory:").await?;

    // Run migrations
    Migrator::up(&db, None).await?;
    seed(&db).await?;

    Ok(db)
}

pub fn setup_test_app(db: DatabaseConnection, settings: SearchSettings) -> Router {
    let search = ContactSearch::new(db.clone(), settings);
    let lookups = Arc::new(DatabaseLookups::new(db));
    Router::new().nest("/api/v1", router(search, lookups))
}

/// Form values as the host would submit them.
pub fn form(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(values) => values,
        other => panic!("form values must be an object, got {other}"),
    }
}

/// Members related to the board, optionally overridden.
pub fn members_related_to_board(membership: &str) -> Map<String, Value> {
    form(serde_json::json!({
        "group_id": [MEMBERS.to_string()],
        "related_group_id": [BOARD.to_string()],
        "including_excluding": membership,
    }))
}

const SEED: &[&str] = &[
    "INSERT INTO civicrm_group (id, title, is_active) VALUES
        (10, 'Members', 1), (20, 'Board', 1), (30, 'Volunteers', 1), (40, 'Archive', 0)",
    "INSERT INTO civicrm_relationship_type (id, label_a_b) VALUES
        (1, 'Employee of'), (2, 'Spouse of'), (3, 'Child of')",
    "INSERT INTO civicrm_contact (id, contact_type, sort_name) VALUES
        (1, 'Individual', 'Anderson, Alice'),
        (2, 'Individual', 'Brown, Bob'),
        (3, 'Individual', 'Clark, Carol'),
        (4, 'Individual', 'Davis, Dave'),
        (5, 'Individual', 'Evans, Eve'),
        (6, 'Individual', 'Fisher, Frank'),
        (7, 'Individual', 'Green, Grace'),
        (8, 'Individual', 'Hill, Heidi'),
        (9, 'Individual', 'Irwin, Ivan'),
        (10, 'Individual', 'Jones, Judy'),
        (11, 'Individual', 'Moore, Mallory'),
        (12, 'Individual', 'Nash, Niaj'),
        (13, 'Individual', 'Olsen, Olivia')",
    "UPDATE civicrm_contact SET is_deceased = 1 WHERE id = 8",
    "UPDATE civicrm_contact SET is_deleted = 1 WHERE id = 9",
    "UPDATE civicrm_contact SET do_not_email = 1 WHERE id = 10",
    "INSERT INTO civicrm_address (contact_id, is_primary, street_address, postal_code, city) VALUES
        (1, 1, '1 Main St', '1000', 'Springfield'),
        (1, 0, '99 Old Rd', '9999', 'Shelbyville'),
        (10, 1, '5 Elm St', '2000', 'Capital City')",
    "INSERT INTO civicrm_group_contact (group_id, contact_id, status) VALUES
        (10, 1, 'Added'), (30, 1, 'Added'),
        (10, 2, 'Added'),
        (10, 3, 'Added'),
        (10, 4, 'Added'),
        (20, 5, 'Added'),
        (20, 6, 'Added'),
        (30, 7, 'Added'),
        (10, 8, 'Added'),
        (10, 9, 'Added'),
        (10, 10, 'Added'),
        (10, 11, 'Removed'),
        (10, 12, 'Added'),
        (20, 13, 'Removed')",
    "INSERT INTO civicrm_relationship (contact_id_a, contact_id_b, relationship_type_id, is_active) VALUES
        (1, 5, 1, 1),
        (6, 2, 2, 1),
        (3, 6, 2, 0),
        (4, 7, 1, 1),
        (8, 5, 3, 1),
        (9, 5, 1, 1),
        (10, 6, 1, 1),
        (11, 5, 1, 1),
        (12, 13, 1, 1)",
];

async fn seed(db: &DatabaseConnection) -> Result<(), DbErr> {
    for statement in SEED {
        db.execute_unprepared(statement).await?;
    }
    Ok(())
}

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(CreateContactSchema)]
    }
}

pub struct CreateContactSchema;

#[async_trait::async_trait]
impl MigrationName for CreateContactSchema {
    fn name(&self) -> &'static str {
        "m20240101_000001_create_contact_schema"
    }
}

fn id_column() -> ColumnDef {
    ColumnDef::new(Alias::new("id"))
        .integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

fn flag_column(name: &str, default: bool) -> ColumnDef {
    ColumnDef::new(Alias::new(name))
        .boolean()
        .not_null()
        .default(default)
        .to_owned()
}

fn integer_column(name: &str) -> ColumnDef {
    ColumnDef::new(Alias::new(name)).integer().not_null().to_owned()
}

fn text_column(name: &str) -> ColumnDef {
    ColumnDef::new(Alias::new(name)).string().null().to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for CreateContactSchema {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut contact = Table::create()
            .table(Alias::new("civicrm_contact"))
            .if_not_exists()
            .col(id_column())
            .col(text_column("contact_type"))
            .col(text_column("sort_name"))
            .col(flag_column("is_deleted", false))
            .col(flag_column("is_deceased", false))
            .to_owned();
        for flag in [
            "do_not_phone",
            "do_not_email",
            "do_not_mail",
            "do_not_sms",
            "do_not_trade",
            "is_opt_out",
        ] {
            contact.col(flag_column(flag, false));
        }

        let tables = [
            contact,
            Table::create()
                .table(Alias::new("civicrm_address"))
                .if_not_exists()
                .col(id_column())
                .col(integer_column("contact_id"))
                .col(flag_column("is_primary", false))
                .col(text_column("street_address"))
                .col(text_column("postal_code"))
                .col(text_column("city"))
                .to_owned(),
            Table::create()
                .table(Alias::new("civicrm_group"))
                .if_not_exists()
                .col(id_column())
                .col(ColumnDef::new(Alias::new("title")).string().not_null())
                .col(flag_column("is_active", true))
                .to_owned(),
            Table::create()
                .table(Alias::new("civicrm_group_contact"))
                .if_not_exists()
                .col(id_column())
                .col(integer_column("group_id"))
                .col(integer_column("contact_id"))
                .col(ColumnDef::new(Alias::new("status")).string().not_null())
                .to_owned(),
            Table::create()
                .table(Alias::new("civicrm_relationship"))
                .if_not_exists()
                .col(id_column())
                .col(integer_column("contact_id_a"))
                .col(integer_column("contact_id_b"))
                .col(integer_column("relationship_type_id"))
                .col(flag_column("is_active", true))
                .to_owned(),
            Table::create()
                .table(Alias::new("civicrm_relationship_type"))
                .if_not_exists()
                .col(id_column())
                .col(ColumnDef::new(Alias::new("label_a_b")).string().not_null())
                .to_owned(),
        ];

        for table in tables {
            manager.create_table(table).await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            "civicrm_relationship_type",
            "civicrm_relationship",
            "civicrm_group_contact",
            "civicrm_group",
            "civicrm_address",
            "civicrm_contact",
        ] {
            manager
                .drop_table(Table::drop().table(Alias::new(table)).to_owned())
                .await?;
        }
        Ok(())
    }
}
