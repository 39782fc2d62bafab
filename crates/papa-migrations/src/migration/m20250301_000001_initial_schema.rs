use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create shops table
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("shops"))
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alias::new("id"))
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Alias::new("shop_domain"))
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Alias::new("created_at"))
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Alias::new("updated_at"))
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Create popups table
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("popups"))
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alias::new("id"))
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Alias::new("shop_id")).string().not_null())
                    .col(ColumnDef::new(Alias::new("name")).string().not_null())
                    .col(
                        ColumnDef::new(Alias::new("is_active"))
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Alias::new("created_at"))
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Alias::new("updated_at"))
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_popups_shop_id")
                            .from(Alias::new("popups"), Alias::new("shop_id"))
                            .to(Alias::new("shops"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create popup_steps table
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("popup_steps"))
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alias::new("id"))
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Alias::new("popup_id")).string().not_null())
                    .col(
                        ColumnDef::new(Alias::new("step_number"))
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Alias::new("step_type")).string().not_null())
                    .col(
                        ColumnDef::new(Alias::new("created_at"))
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_popup_steps_popup_id")
                            .from(Alias::new("popup_steps"), Alias::new("popup_id"))
                            .to(Alias::new("popups"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Step numbers are unique within a popup
        manager
            .create_index(
                Index::create()
                    .name("idx_popup_steps_popup_step_number")
                    .table(Alias::new("popup_steps"))
                    .col(Alias::new("popup_id"))
                    .col(Alias::new("step_number"))
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create popup_events table (append-only)
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("popup_events"))
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alias::new("id"))
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Alias::new("shop_id")).string().not_null())
                    .col(ColumnDef::new(Alias::new("popup_id")).string().null())
                    .col(ColumnDef::new(Alias::new("event_type")).text().not_null())
                    .col(ColumnDef::new(Alias::new("step_number")).integer().null())
                    .col(
                        ColumnDef::new(Alias::new("timestamp"))
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_popup_events_shop_id")
                            .from(Alias::new("popup_events"), Alias::new("shop_id"))
                            .to(Alias::new("shops"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_popup_events_popup_id")
                            .from(Alias::new("popup_events"), Alias::new("popup_id"))
                            .to(Alias::new("popups"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create collected_emails table
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("collected_emails"))
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alias::new("id"))
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Alias::new("shop_id")).string().not_null())
                    .col(ColumnDef::new(Alias::new("popup_id")).string().null())
                    .col(ColumnDef::new(Alias::new("email")).string().not_null())
                    .col(
                        ColumnDef::new(Alias::new("created_at"))
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_collected_emails_shop_id")
                            .from(Alias::new("collected_emails"), Alias::new("shop_id"))
                            .to(Alias::new("shops"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_collected_emails_popup_id")
                            .from(Alias::new("collected_emails"), Alias::new("popup_id"))
                            .to(Alias::new("popups"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            "collected_emails",
            "popup_events",
            "popup_steps",
            "popups",
            "shops",
        ] {
            manager
                .drop_table(
                    Table::drop()
                        .table(Alias::new(table))
                        .if_exists()
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }
}
