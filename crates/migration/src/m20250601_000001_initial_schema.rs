use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DbBackend;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create zones table
        manager
            .create_table(
                Table::create()
                    .table(Zones::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Zones::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Zones::Name).string().not_null())
                    .col(ColumnDef::new(Zones::YardId).uuid().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_zones_yard")
                    .table(Zones::Table)
                    .col(Zones::YardId)
                    .to_owned(),
            )
            .await?;

        // Create tags table
        manager
            .create_table(
                Table::create()
                    .table(Tags::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tags::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Tags::Code).string().not_null())
                    .col(
                        ColumnDef::new(Tags::BatteryLevel)
                            .small_integer()
                            .not_null()
                            .default(100),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_tags_code")
                    .table(Tags::Table)
                    .col(Tags::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create vehicles table
        manager
            .create_table(
                Table::create()
                    .table(Vehicles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Vehicles::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Vehicles::Plate).string())
                    .col(ColumnDef::new(Vehicles::Model).string().not_null())
                    .col(ColumnDef::new(Vehicles::Status).string().not_null())
                    .col(ColumnDef::new(Vehicles::CurrentZoneId).uuid())
                    .col(ColumnDef::new(Vehicles::LastBeaconCode).string())
                    .col(ColumnDef::new(Vehicles::LastSeenAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Vehicles::BoundTagId).uuid().not_null())
                    .col(
                        ColumnDef::new(Vehicles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vehicle_tag")
                            .from(Vehicles::Table, Vehicles::BoundTagId)
                            .to(Tags::Table, Tags::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vehicle_zone")
                            .from(Vehicles::Table, Vehicles::CurrentZoneId)
                            .to(Zones::Table, Zones::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_vehicles_plate")
                    .table(Vehicles::Table)
                    .col(Vehicles::Plate)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // The binding bijection. Tag swaps update two rows in one
        // transaction, so the uniqueness check must be deferrable to
        // commit time. SQLite cannot defer unique indexes, so there the
        // column gets a plain lookup index and the application-level
        // checks carry the invariant.
        if manager.get_database_backend() == DbBackend::Postgres {
            manager
                .get_connection()
                .execute_unprepared(
                    "ALTER TABLE vehicles ADD CONSTRAINT uq_vehicles_bound_tag \
                     UNIQUE (bound_tag_id) DEFERRABLE INITIALLY IMMEDIATE",
                )
                .await?;
        } else {
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_vehicles_bound_tag")
                        .table(Vehicles::Table)
                        .col(Vehicles::BoundTagId)
                        .to_owned(),
                )
                .await?;
        }

        // Create beacons table
        manager
            .create_table(
                Table::create()
                    .table(Beacons::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Beacons::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Beacons::Code).string().not_null())
                    .col(
                        ColumnDef::new(Beacons::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Beacons::ZoneId).uuid())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_beacon_zone")
                            .from(Beacons::Table, Beacons::ZoneId)
                            .to(Zones::Table, Zones::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_beacons_code")
                    .table(Beacons::Table)
                    .col(Beacons::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create zone_occupancy table (the transition ledger)
        manager
            .create_table(
                Table::create()
                    .table(ZoneOccupancy::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ZoneOccupancy::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ZoneOccupancy::VehicleId).uuid().not_null())
                    .col(ColumnDef::new(ZoneOccupancy::ZoneId).uuid().not_null())
                    .col(
                        ColumnDef::new(ZoneOccupancy::EnteredAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ZoneOccupancy::ExitedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_occupancy_vehicle")
                            .from(ZoneOccupancy::Table, ZoneOccupancy::VehicleId)
                            .to(Vehicles::Table, Vehicles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_occupancy_zone")
                            .from(ZoneOccupancy::Table, ZoneOccupancy::ZoneId)
                            .to(Zones::Table, Zones::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_occupancy_vehicle_time")
                    .table(ZoneOccupancy::Table)
                    .col(ZoneOccupancy::VehicleId)
                    .col(ZoneOccupancy::EnteredAt)
                    .to_owned(),
            )
            .await?;

        // At most one open interval per vehicle, enforced at the storage
        // level. Postgres and SQLite both support partial unique indexes.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS uq_occupancy_open_vehicle \
                 ON zone_occupancy (vehicle_id) WHERE exited_at IS NULL",
            )
            .await?;

        // Create zone_routing_rules table
        manager
            .create_table(
                Table::create()
                    .table(ZoneRoutingRules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ZoneRoutingRules::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ZoneRoutingRules::YardId).uuid().not_null())
                    .col(ColumnDef::new(ZoneRoutingRules::Status).string().not_null())
                    .col(ColumnDef::new(ZoneRoutingRules::ZoneId).uuid().not_null())
                    .col(
                        ColumnDef::new(ZoneRoutingRules::Priority)
                            .integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rule_zone")
                            .from(ZoneRoutingRules::Table, ZoneRoutingRules::ZoneId)
                            .to(Zones::Table, Zones::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_rules_yard_status_priority")
                    .table(ZoneRoutingRules::Table)
                    .col(ZoneRoutingRules::YardId)
                    .col(ZoneRoutingRules::Status)
                    .col(ZoneRoutingRules::Priority)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ZoneRoutingRules::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ZoneOccupancy::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Beacons::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Vehicles::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Tags::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Zones::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Zones {
    Table,
    Id,
    Name,
    YardId,
}

#[derive(DeriveIden)]
enum Tags {
    Table,
    Id,
    Code,
    BatteryLevel,
}

#[derive(DeriveIden)]
enum Vehicles {
    Table,
    Id,
    Plate,
    Model,
    Status,
    CurrentZoneId,
    LastBeaconCode,
    LastSeenAt,
    BoundTagId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Beacons {
    Table,
    Id,
    Code,
    Active,
    ZoneId,
}

#[derive(DeriveIden)]
enum ZoneOccupancy {
    Table,
    Id,
    VehicleId,
    ZoneId,
    EnteredAt,
    ExitedAt,
}

#[derive(DeriveIden)]
enum ZoneRoutingRules {
    Table,
    Id,
    YardId,
    Status,
    ZoneId,
    Priority,
}
