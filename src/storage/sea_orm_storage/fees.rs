use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use super::{SeaOrmStorage, db_error, write_error};
use crate::entity::fee_settings::{ActiveModel, Column, Entity as FeeSettings};
use crate::errors::Result;
use crate::models::fees::entities::{FeeScope, FeeSetting};
use crate::storage::FeeStorage;
use crate::utils::{new_id, now_ts};

#[async_trait]
impl FeeStorage for SeaOrmStorage {
    async fn create_fee_setting(
        &self,
        institution_id: &str,
        scope: FeeScope,
        target_id: &str,
        amount_minor: i64,
    ) -> Result<FeeSetting> {
        let now = now_ts();
        let result = ActiveModel {
            id: Set(new_id()),
            institution_id: Set(institution_id.to_string()),
            scope: Set(scope.to_string()),
            target_id: Set(target_id.to_string()),
            amount_minor: Set(amount_minor),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(write_error(
            "创建学费设置失败",
            "A fee is already set for this target",
        ))?;

        Ok(result.into_fee_setting())
    }

    async fn get_fee_setting(&self, id: &str) -> Result<Option<FeeSetting>> {
        let result = FeeSettings::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询学费设置失败"))?;

        Ok(result.map(|m| m.into_fee_setting()))
    }

    async fn find_fee_setting(
        &self,
        scope: FeeScope,
        target_id: &str,
    ) -> Result<Option<FeeSetting>> {
        let result = FeeSettings::find()
            .filter(Column::Scope.eq(scope.as_str()))
            .filter(Column::TargetId.eq(target_id))
            .one(&self.db)
            .await
            .map_err(db_error("查询学费设置失败"))?;

        Ok(result.map(|m| m.into_fee_setting()))
    }

    async fn list_fee_settings(
        &self,
        institution_ids: &[String],
        scope: Option<FeeScope>,
    ) -> Result<Vec<FeeSetting>> {
        if institution_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut select =
            FeeSettings::find().filter(Column::InstitutionId.is_in(institution_ids.iter().cloned()));
        if let Some(scope) = scope {
            select = select.filter(Column::Scope.eq(scope.as_str()));
        }

        let result = select
            .order_by_desc(Column::UpdatedAt)
            .all(&self.db)
            .await
            .map_err(db_error("查询学费设置列表失败"))?;

        Ok(result.into_iter().map(|m| m.into_fee_setting()).collect())
    }

    async fn update_fee_setting(&self, id: &str, amount_minor: i64) -> Result<Option<FeeSetting>> {
        let Some(existing) = FeeSettings::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询学费设置失败"))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.amount_minor = Set(amount_minor);
        model.updated_at = Set(now_ts());
        let result = model
            .update(&self.db)
            .await
            .map_err(db_error("更新学费设置失败"))?;

        Ok(Some(result.into_fee_setting()))
    }

    async fn delete_fee_setting(&self, id: &str) -> Result<bool> {
        let result = FeeSettings::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_error("删除学费设置失败"))?;

        Ok(result.rows_affected > 0)
    }
}
