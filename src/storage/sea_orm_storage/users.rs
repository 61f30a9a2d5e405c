use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::{SeaOrmStorage, db_error, fetch_page, write_error};
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::Result;
use crate::models::{
    PaginatedResponse,
    users::{
        entities::User,
        requests::{NewUser, RoleFlagsUpdate, UpdateProfileRequest, UserListParams},
    },
};
use crate::storage::UserStorage;
use crate::utils::{escape_like_pattern, new_id, now_ts};

#[async_trait]
impl UserStorage for SeaOrmStorage {
    /// 创建用户
    async fn create_user(&self, user: NewUser) -> Result<User> {
        let now = now_ts();

        let model = ActiveModel {
            id: Set(new_id()),
            email: Set(user.email),
            phone_number: Set(user.phone_number),
            password_hash: Set(user.password_hash),
            first_name: Set(user.first_name),
            last_name: Set(user.last_name),
            gender: Set(None),
            birth_date: Set(None),
            is_institution: Set(user.is_institution),
            is_teacher: Set(false),
            is_student: Set(false),
            is_parents: Set(false),
            is_admission_seeker: Set(user.is_admission_seeker),
            is_active: Set(user.is_active),
            is_staff: Set(user.is_staff),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(write_error("创建用户失败", "User already exists"))?;

        Ok(result.into_user())
    }

    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询用户失败"))?;

        Ok(result.map(|m| m.into_user()))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Email.eq(email.to_lowercase()))
            .one(&self.db)
            .await
            .map_err(db_error("查询用户失败"))?;

        Ok(result.map(|m| m.into_user()))
    }

    async fn get_user_by_phone(&self, phone_number: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::PhoneNumber.eq(phone_number))
            .one(&self.db)
            .await
            .map_err(db_error("查询用户失败"))?;

        Ok(result.map(|m| m.into_user()))
    }

    async fn get_users_by_ids(&self, ids: &[String]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let users = Users::find()
            .filter(Column::Id.is_in(ids.iter().cloned()))
            .all(&self.db)
            .await
            .map_err(db_error("批量查询用户失败"))?;

        Ok(users.into_iter().map(|m| m.into_user()).collect())
    }

    /// 分页列出用户
    async fn list_users(&self, params: UserListParams) -> Result<PaginatedResponse<User>> {
        let mut select = Users::find();

        // 搜索条件
        if let Some(ref search) = params.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Email.contains(&escaped))
                    .add(Column::PhoneNumber.contains(&escaped))
                    .add(Column::FirstName.contains(&escaped))
                    .add(Column::LastName.contains(&escaped)),
            );
        }

        select = select.order_by_desc(Column::CreatedAt);

        fetch_page(&self.db, select, &params.pagination, |m| m.into_user()).await
    }

    async fn update_profile(&self, id: &str, update: UpdateProfileRequest) -> Result<Option<User>> {
        let Some(existing) = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询用户失败"))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        if let Some(first_name) = update.first_name {
            model.first_name = Set(first_name);
        }
        if let Some(last_name) = update.last_name {
            model.last_name = Set(last_name);
        }
        if let Some(gender) = update.gender {
            model.gender = Set(Some(gender.to_string()));
        }
        if let Some(birth_date) = update.birth_date {
            model.birth_date = Set(Some(birth_date));
        }
        model.updated_at = Set(now_ts());

        let result = model
            .update(&self.db)
            .await
            .map_err(db_error("更新用户资料失败"))?;

        Ok(Some(result.into_user()))
    }

    async fn update_password(&self, id: &str, password_hash: &str) -> Result<bool> {
        let result = Users::update_many()
            .col_expr(
                Column::PasswordHash,
                sea_orm::sea_query::Expr::value(password_hash),
            )
            .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now_ts()))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_error("更新密码失败"))?;

        Ok(result.rows_affected > 0)
    }

    async fn activate_user(&self, id: &str) -> Result<bool> {
        let result = Users::update_many()
            .col_expr(Column::IsActive, sea_orm::sea_query::Expr::value(true))
            .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now_ts()))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_error("激活用户失败"))?;

        Ok(result.rows_affected > 0)
    }

    async fn reset_inactive_user(&self, id: &str, user: NewUser) -> Result<Option<User>> {
        let Some(existing) = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询用户失败"))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.password_hash = Set(user.password_hash);
        model.first_name = Set(user.first_name);
        model.last_name = Set(user.last_name);
        model.is_institution = Set(user.is_institution);
        model.is_admission_seeker = Set(user.is_admission_seeker);
        model.is_active = Set(false);
        model.updated_at = Set(now_ts());

        let result = model
            .update(&self.db)
            .await
            .map_err(db_error("重置用户失败"))?;

        Ok(Some(result.into_user()))
    }

    async fn update_role_flags(&self, id: &str, flags: RoleFlagsUpdate) -> Result<bool> {
        let Some(existing) = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询用户失败"))?
        else {
            return Ok(false);
        };

        let mut model: ActiveModel = existing.into();
        apply_role_flags(&mut model, flags);
        model.updated_at = Set(now_ts());
        model
            .update(&self.db)
            .await
            .map_err(db_error("更新用户角色失败"))?;

        Ok(true)
    }
}

/// 只覆盖提供了值的标志位
pub(super) fn apply_role_flags(model: &mut ActiveModel, flags: RoleFlagsUpdate) {
    if let Some(v) = flags.is_institution {
        model.is_institution = Set(v);
    }
    if let Some(v) = flags.is_teacher {
        model.is_teacher = Set(v);
    }
    if let Some(v) = flags.is_student {
        model.is_student = Set(v);
    }
    if let Some(v) = flags.is_parents {
        model.is_parents = Set(v);
    }
    if let Some(v) = flags.is_admission_seeker {
        model.is_admission_seeker = Set(v);
    }
}
