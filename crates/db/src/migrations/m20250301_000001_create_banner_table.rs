//! Create banner table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Banner::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Banner::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Banner::Title).string_len(256).not_null())
                    .col(
                        ColumnDef::new(Banner::PublishState)
                            .string_len(16)
                            .not_null()
                            .default("draft"),
                    )
                    .col(ColumnDef::new(Banner::Content).text().not_null())
                    .col(ColumnDef::new(Banner::CtaText).string_len(128))
                    .col(ColumnDef::new(Banner::CtaUrl).string_len(1024))
                    .col(ColumnDef::new(Banner::CtaNewTab).boolean().not_null().default(false))
                    .col(
                        ColumnDef::new(Banner::Placement)
                            .string_len(16)
                            .not_null()
                            .default("top_bar"),
                    )
                    .col(ColumnDef::new(Banner::FloatingCorner).string_len(16))
                    .col(ColumnDef::new(Banner::SideMode).string_len(8))
                    .col(ColumnDef::new(Banner::ModalDelaySecs).integer())
                    .col(
                        ColumnDef::new(Banner::TargetingMode)
                            .string_len(16)
                            .not_null()
                            .default("all_pages"),
                    )
                    .col(
                        ColumnDef::new(Banner::TargetPages)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(ColumnDef::new(Banner::StartsAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Banner::EndsAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Banner::IsRecurring).boolean().not_null().default(false))
                    .col(ColumnDef::new(Banner::RecurringYear).integer())
                    .col(ColumnDef::new(Banner::IsDismissible).boolean().not_null().default(true))
                    .col(ColumnDef::new(Banner::BgColor).string_len(16))
                    .col(ColumnDef::new(Banner::TextColor).string_len(16))
                    .col(ColumnDef::new(Banner::CtaBgColor).string_len(16))
                    .col(ColumnDef::new(Banner::CtaTextColor).string_len(16))
                    .col(ColumnDef::new(Banner::Animation).string_len(8))
                    .col(
                        ColumnDef::new(Banner::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Banner::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Index: publish_state (the selection engine filters on it)
        manager
            .create_index(
                Index::create()
                    .name("idx_banner_publish_state")
                    .table(Banner::Table)
                    .col(Banner::PublishState)
                    .to_owned(),
            )
            .await?;

        // Index: created_at (newest-first ordering)
        manager
            .create_index(
                Index::create()
                    .name("idx_banner_created_at")
                    .table(Banner::Table)
                    .col(Banner::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Index: ends_at (expired-recurring lookups)
        manager
            .create_index(
                Index::create()
                    .name("idx_banner_ends_at")
                    .table(Banner::Table)
                    .col(Banner::EndsAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Banner::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Banner {
    Table,
    Id,
    Title,
    PublishState,
    Content,
    CtaText,
    CtaUrl,
    CtaNewTab,
    Placement,
    FloatingCorner,
    SideMode,
    ModalDelaySecs,
    TargetingMode,
    TargetPages,
    StartsAt,
    EndsAt,
    IsRecurring,
    RecurringYear,
    IsDismissible,
    BgColor,
    TextColor,
    CtaBgColor,
    CtaTextColor,
    Animation,
    CreatedAt,
    UpdatedAt,
}
