use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Every aggregate filters on shop + event type + time window
        manager
            .create_index(
                Index::create()
                    .name("idx_popup_events_shop_type_timestamp")
                    .table(Alias::new("popup_events"))
                    .col(Alias::new("shop_id"))
                    .col(Alias::new("event_type"))
                    .col(Alias::new("timestamp"))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_popup_events_popup_type_step")
                    .table(Alias::new("popup_events"))
                    .col(Alias::new("popup_id"))
                    .col(Alias::new("event_type"))
                    .col(Alias::new("step_number"))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_collected_emails_shop_created_at")
                    .table(Alias::new("collected_emails"))
                    .col(Alias::new("shop_id"))
                    .col(Alias::new("created_at"))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, table) in [
            ("idx_collected_emails_shop_created_at", "collected_emails"),
            ("idx_popup_events_popup_type_step", "popup_events"),
            ("idx_popup_events_shop_type_timestamp", "popup_events"),
        ] {
            manager
                .drop_index(
                    Index::drop()
                        .name(name)
                        .table(Alias::new(table))
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }
}
