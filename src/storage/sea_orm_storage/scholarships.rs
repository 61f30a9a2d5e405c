use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use super::{SeaOrmStorage, db_error, write_error};
use crate::entity::scholarships::{ActiveModel, Column, Entity as Scholarships};
use crate::errors::Result;
use crate::models::scholarships::entities::Scholarship;
use crate::storage::ScholarshipStorage;
use crate::utils::{new_id, now_ts};

#[async_trait]
impl ScholarshipStorage for SeaOrmStorage {
    async fn create_scholarship(
        &self,
        institution_id: &str,
        student_enrollment_id: &str,
        percentage_hundredths: i64,
        is_active: bool,
    ) -> Result<Scholarship> {
        let now = now_ts();
        let result = ActiveModel {
            id: Set(new_id()),
            institution_id: Set(institution_id.to_string()),
            student_enrollment_id: Set(student_enrollment_id.to_string()),
            percentage_hundredths: Set(percentage_hundredths),
            is_active: Set(is_active),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(write_error(
            "创建奖学金失败",
            "Scholarship already exists for this enrollment",
        ))?;

        Ok(result.into_scholarship())
    }

    async fn get_scholarship(&self, id: &str) -> Result<Option<Scholarship>> {
        let result = Scholarships::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询奖学金失败"))?;

        Ok(result.map(|m| m.into_scholarship()))
    }

    async fn find_scholarship_by_enrollment(
        &self,
        student_enrollment_id: &str,
    ) -> Result<Option<Scholarship>> {
        let result = Scholarships::find()
            .filter(Column::StudentEnrollmentId.eq(student_enrollment_id))
            .one(&self.db)
            .await
            .map_err(db_error("查询奖学金失败"))?;

        Ok(result.map(|m| m.into_scholarship()))
    }

    async fn list_scholarships(&self, institution_ids: &[String]) -> Result<Vec<Scholarship>> {
        if institution_ids.is_empty() {
            return Ok(Vec::new());
        }
        let result = Scholarships::find()
            .filter(Column::InstitutionId.is_in(institution_ids.iter().cloned()))
            .order_by_desc(Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_error("查询奖学金列表失败"))?;

        Ok(result.into_iter().map(|m| m.into_scholarship()).collect())
    }

    async fn update_scholarship(
        &self,
        id: &str,
        percentage_hundredths: Option<i64>,
        is_active: Option<bool>,
    ) -> Result<Option<Scholarship>> {
        let Some(existing) = Scholarships::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询奖学金失败"))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        if let Some(hundredths) = percentage_hundredths {
            model.percentage_hundredths = Set(hundredths);
        }
        if let Some(is_active) = is_active {
            model.is_active = Set(is_active);
        }
        model.updated_at = Set(now_ts());
        let result = model
            .update(&self.db)
            .await
            .map_err(db_error("更新奖学金失败"))?;

        Ok(Some(result.into_scholarship()))
    }

    async fn delete_scholarship(&self, id: &str) -> Result<bool> {
        let result = Scholarships::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_error("删除奖学金失败"))?;

        Ok(result.rows_affected > 0)
    }
}
