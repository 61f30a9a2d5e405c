use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::{SeaOrmStorage, db_error, write_error};
use crate::entity::institution_memberships;
use crate::entity::institutions::{ActiveModel, Column, Entity as Institutions};
use crate::errors::Result;
use crate::models::institutions::{
    entities::Institution,
    requests::{CreateInstitutionRequest, UpdateInstitutionRequest},
};
use crate::models::memberships::entities::MembershipRole;
use crate::storage::InstitutionStorage;
use crate::utils::{new_id, now_ts};

#[async_trait]
impl InstitutionStorage for SeaOrmStorage {
    async fn create_institution(
        &self,
        admin_id: &str,
        req: CreateInstitutionRequest,
    ) -> Result<Institution> {
        let now = now_ts();
        let txn = self.db.begin().await.map_err(db_error("开启事务失败"))?;

        let institution = ActiveModel {
            id: Set(new_id()),
            name: Set(req.name.trim().to_string()),
            description: Set(req.description),
            short_code: Set(req.short_code.map(|c| c.trim().to_string())),
            address: Set(req.address),
            institution_type: Set(req.institution_type.to_string()),
            is_active: Set(true),
            admin_id: Set(admin_id.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(write_error("创建机构失败", "Institution short code already in use"))?;

        // 创建者自动成为机构管理员
        institution_memberships::ActiveModel {
            id: Set(new_id()),
            institution_id: Set(institution.id.clone()),
            user_id: Set(admin_id.to_string()),
            role: Set(MembershipRole::Admin.to_string()),
            created_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(write_error("创建机构管理员失败", "Membership already exists"))?;

        txn.commit().await.map_err(db_error("提交事务失败"))?;

        Ok(institution.into_institution())
    }

    async fn get_institution_by_id(&self, id: &str) -> Result<Option<Institution>> {
        let result = Institutions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询机构失败"))?;

        Ok(result.map(|m| m.into_institution()))
    }

    async fn get_institution_by_short_code(&self, code: &str) -> Result<Option<Institution>> {
        let result = Institutions::find()
            .filter(Column::ShortCode.eq(code))
            .one(&self.db)
            .await
            .map_err(db_error("查询机构失败"))?;

        Ok(result.map(|m| m.into_institution()))
    }

    async fn list_institutions_by_admin(&self, admin_id: &str) -> Result<Vec<Institution>> {
        let result = Institutions::find()
            .filter(Column::AdminId.eq(admin_id))
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(db_error("查询机构列表失败"))?;

        Ok(result.into_iter().map(|m| m.into_institution()).collect())
    }

    async fn list_all_institutions(&self) -> Result<Vec<Institution>> {
        let result = Institutions::find()
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(db_error("查询机构列表失败"))?;

        Ok(result.into_iter().map(|m| m.into_institution()).collect())
    }

    async fn update_institution(
        &self,
        id: &str,
        update: UpdateInstitutionRequest,
    ) -> Result<Option<Institution>> {
        let Some(existing) = Institutions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询机构失败"))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        if let Some(name) = update.name {
            model.name = Set(name.trim().to_string());
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(code) = update.short_code {
            model.short_code = Set(Some(code.trim().to_string()));
        }
        if let Some(address) = update.address {
            model.address = Set(Some(address));
        }
        if let Some(kind) = update.institution_type {
            model.institution_type = Set(kind.to_string());
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }
        model.updated_at = Set(now_ts());

        let result = model
            .update(&self.db)
            .await
            .map_err(write_error("更新机构失败", "Institution short code already in use"))?;

        Ok(Some(result.into_institution()))
    }
}
