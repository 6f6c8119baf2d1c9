//! 访问记录表迁移
//!
//! 创建 hits 表用于存储每一次访问事件，包括：
//! - 多态目标 (hittable_type, hittable_id)
//! - IP 地址、User-Agent、请求方法
//! - 来源 (referer) 与完整 URL
//! - 可选的登录用户 ID

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Hits::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Hits::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Hits::HittableType)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Hits::HittableId).big_integer().not_null())
                    // IPv6 文本形式最长 45 字符
                    .col(ColumnDef::new(Hits::Ip).string_len(45).not_null())
                    .col(ColumnDef::new(Hits::UserAgent).text().not_null())
                    // 不做外键约束：用户删除后记录保留
                    .col(ColumnDef::new(Hits::UserId).big_integer().null())
                    .col(ColumnDef::new(Hits::Referer).string_len(500).null())
                    .col(
                        ColumnDef::new(Hits::Method)
                            .string_len(10)
                            .not_null()
                            .default("GET"),
                    )
                    .col(ColumnDef::new(Hits::Url).text().null())
                    .col(
                        ColumnDef::new(Hits::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Hits::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 多态关联索引（单实体查询）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_hits_hittable")
                    .table(Hits::Table)
                    .col(Hits::HittableType)
                    .col(Hits::HittableId)
                    .to_owned(),
            )
            .await?;

        // ip + created_at（冷却期检查）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_hits_ip_created")
                    .table(Hits::Table)
                    .col(Hits::Ip)
                    .col(Hits::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // user_id + created_at（按用户查询）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_hits_user_created")
                    .table(Hits::Table)
                    .col(Hits::UserId)
                    .col(Hits::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_hits_user_created").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_hits_ip_created").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_hits_hittable").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Hits::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Hits {
    #[sea_orm(iden = "hits")]
    Table,
    Id,
    HittableType,
    HittableId,
    Ip,
    UserAgent,
    UserId,
    Referer,
    Method,
    Url,
    CreatedAt,
    UpdatedAt,
}
