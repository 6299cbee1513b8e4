use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait,
    ExprTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
    sea_query::{Expr, Func, LikeExpr},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utils::response::FieldIssue;
use uuid::Uuid;

use crate::{entities::task, models::ids};
pub use crate::types::{TaskPriority, TaskStatus};

pub const TITLE_MAX_LEN: usize = 100;
pub const DESCRIPTION_MAX_LEN: usize = 500;

const DEFAULT_PAGE: u64 = 1;
const DEFAULT_LIMIT: u64 = 10;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("Task not found")]
    TaskNotFound,
    #[error("Not authorized to access this task")]
    NotTaskOwner,
    #[error("Task owner not found")]
    OwnerNotFound,
    #[error("Validation failed")]
    Validation(Vec<FieldIssue>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    /// Opaque inline file payloads; carried through reads untouched.
    pub attachments: Vec<String>,
    /// Owner user id, fixed at creation. No write path accepts it.
    pub owner: Uuid,
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw create input. Field types are deliberately loose: validation owns
/// the parsing so a response can enumerate every violated field at once.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
}

/// Normalized, validated field set shared by create and update.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
}

impl TaskDraft {
    pub fn validate(
        title: Option<&str>,
        description: Option<&str>,
        status: Option<&str>,
        priority: Option<&str>,
    ) -> Result<Self, TaskError> {
        let mut issues = Vec::new();

        let title = title.map(str::trim).unwrap_or_default();
        if title.is_empty() {
            issues.push(FieldIssue::new("title", "Please provide a task title"));
        } else if title.chars().count() > TITLE_MAX_LEN {
            issues.push(FieldIssue::new(
                "title",
                "Title cannot be more than 100 characters",
            ));
        }

        let description = description
            .map(str::trim)
            .filter(|value| !value.is_empty());
        if let Some(value) = description
            && value.chars().count() > DESCRIPTION_MAX_LEN
        {
            issues.push(FieldIssue::new(
                "description",
                "Description cannot be more than 500 characters",
            ));
        }

        let status = match status.map(str::trim).filter(|value| !value.is_empty()) {
            None => TaskStatus::default(),
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                issues.push(FieldIssue::new(
                    "status",
                    "Status must be one of: pending, in-progress, completed",
                ));
                TaskStatus::default()
            }),
        };

        let priority = match priority.map(str::trim).filter(|value| !value.is_empty()) {
            None => TaskPriority::default(),
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                issues.push(FieldIssue::new(
                    "priority",
                    "Priority must be one of: low, medium, high",
                ));
                TaskPriority::default()
            }),
        };

        if !issues.is_empty() {
            return Err(TaskError::Validation(issues));
        }

        Ok(Self {
            title: title.to_string(),
            description: description.map(str::to_string),
            status,
            priority,
        })
    }
}

impl CreateTask {
    pub fn validate(&self) -> Result<TaskDraft, TaskError> {
        TaskDraft::validate(
            self.title.as_deref(),
            self.description.as_deref(),
            self.status.as_deref(),
            self.priority.as_deref(),
        )
    }
}

impl UpdateTask {
    /// Merge the partial update over the stored record, then re-validate the
    /// whole field set. An explicit empty-string description clears it; an
    /// omitted field keeps the stored value.
    pub fn merge_with(&self, existing: &Task) -> Result<TaskDraft, TaskError> {
        let title = self
            .title
            .clone()
            .unwrap_or_else(|| existing.title.clone());
        let description = match &self.description {
            Some(value) => Some(value.clone()),
            None => existing.description.clone(),
        };
        let status = self
            .status
            .clone()
            .unwrap_or_else(|| existing.status.to_string());
        let priority = self
            .priority
            .clone()
            .unwrap_or_else(|| existing.priority.to_string());

        TaskDraft::validate(
            Some(&title),
            description.as_deref(),
            Some(&status),
            Some(&priority),
        )
    }
}

/// Optional list predicates. Status and priority are matched as raw strings
/// so an unknown value filters everything out instead of erroring.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct TaskFilter {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    /// Query parameters arrive as raw strings; non-numeric or non-positive
    /// values fall back to the defaults rather than rejecting the request.
    pub fn from_raw(page: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            page: parse_positive(page, DEFAULT_PAGE),
            limit: parse_positive(limit, DEFAULT_LIMIT),
        }
    }
}

fn parse_positive(raw: Option<&str>, default: u64) -> u64 {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|value| *value > 0)
        .map(|value| value as u64)
        .unwrap_or(default)
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub pages: u64,
}

#[derive(Debug)]
pub struct TaskPage {
    pub tasks: Vec<Task>,
    pub pagination: PaginationMeta,
}

/// Every predicate set starts from the owner restriction; there is no way
/// to build an unscoped task query through this module.
fn scoped_query(owner_row_id: i64, filter: &TaskFilter) -> Select<task::Entity> {
    let mut query = task::Entity::find().filter(task::Column::UserId.eq(owner_row_id));

    if let Some(status) = trimmed(&filter.status) {
        query = query.filter(task::Column::Status.eq(status));
    }
    if let Some(priority) = trimmed(&filter.priority) {
        query = query.filter(task::Column::Priority.eq(priority));
    }
    if let Some(search) = trimmed(&filter.search) {
        // lower() on both sides keeps the match case-insensitive on every
        // backend; LIKE metacharacters in the needle are matched literally.
        let needle = format!("%{}%", escape_like(&search.to_lowercase()));
        query = query.filter(
            Condition::any()
                .add(
                    Expr::expr(Func::lower(Expr::col(task::Column::Title)))
                        .like(LikeExpr::new(needle.clone()).escape('\\')),
                )
                .add(
                    Expr::expr(Func::lower(Expr::col(task::Column::Description)))
                        .like(LikeExpr::new(needle).escape('\\')),
                ),
        );
    }

    query
}

fn trimmed(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

impl Task {
    fn from_model(model: task::Model, owner: Uuid) -> Self {
        let attachments = serde_json::from_value(model.attachments).unwrap_or_default();
        Self {
            id: model.uuid,
            title: model.title,
            description: model.description,
            status: model.status,
            priority: model.priority,
            attachments,
            owner,
            order: model.task_order,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }

    async fn owner_row_id<C: ConnectionTrait>(db: &C, owner: Uuid) -> Result<i64, TaskError> {
        ids::user_id_by_uuid(db, owner)
            .await?
            .ok_or(TaskError::OwnerNotFound)
    }

    /// Owner-checked fetch: not-found and not-owner are reported distinctly,
    /// and the ownership check happens before anything else can proceed.
    pub async fn find_owned<C: ConnectionTrait>(
        db: &C,
        owner: Uuid,
        id: Uuid,
    ) -> Result<Self, TaskError> {
        let record = task::Entity::find()
            .filter(task::Column::Uuid.eq(id))
            .one(db)
            .await?
            .ok_or(TaskError::TaskNotFound)?;

        let owner_row_id = Self::owner_row_id(db, owner).await?;
        if record.user_id != owner_row_id {
            return Err(TaskError::NotTaskOwner);
        }

        Ok(Self::from_model(record, owner))
    }

    pub async fn search_by_owner<C: ConnectionTrait>(
        db: &C,
        owner: Uuid,
        filter: &TaskFilter,
        page: Pagination,
    ) -> Result<TaskPage, TaskError> {
        let owner_row_id = Self::owner_row_id(db, owner).await?;
        let query = scoped_query(owner_row_id, filter).order_by_desc(task::Column::CreatedAt);

        let total = query.clone().count(db).await?;
        // page and limit come from the query string; clamp the product so an
        // absurd page number yields an empty page instead of overflowing.
        // Drivers bind offsets as signed, hence the i64 ceiling.
        let offset = Ord::min(
            page.page
                .saturating_sub(1)
                .checked_mul(page.limit)
                .unwrap_or(u64::MAX),
            i64::MAX as u64,
        );
        let models = query.limit(page.limit).offset(offset).all(db).await?;

        let tasks = models
            .into_iter()
            .map(|model| Self::from_model(model, owner))
            .collect();

        Ok(TaskPage {
            tasks,
            pagination: PaginationMeta {
                page: page.page,
                limit: page.limit,
                total,
                pages: total.div_ceil(page.limit),
            },
        })
    }

    /// Full owned set, newest first. Export and reporting path.
    pub async fn find_all_by_owner<C: ConnectionTrait>(
        db: &C,
        owner: Uuid,
    ) -> Result<Vec<Self>, TaskError> {
        let owner_row_id = Self::owner_row_id(db, owner).await?;
        let models = task::Entity::find()
            .filter(task::Column::UserId.eq(owner_row_id))
            .order_by_desc(task::Column::CreatedAt)
            .all(db)
            .await?;
        Ok(models
            .into_iter()
            .map(|model| Self::from_model(model, owner))
            .collect())
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        owner: Uuid,
        draft: &TaskDraft,
        task_id: Uuid,
    ) -> Result<Self, TaskError> {
        let owner_row_id = Self::owner_row_id(db, owner).await?;
        let now = Utc::now();
        let active = task::ActiveModel {
            uuid: Set(task_id),
            user_id: Set(owner_row_id),
            title: Set(draft.title.clone()),
            description: Set(draft.description.clone()),
            status: Set(draft.status.clone()),
            priority: Set(draft.priority.clone()),
            attachments: Set(serde_json::Value::Array(Vec::new())),
            task_order: Set(0),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };
        let model = active.insert(db).await?;
        Ok(Self::from_model(model, owner))
    }

    pub async fn update<C: ConnectionTrait>(
        db: &C,
        owner: Uuid,
        id: Uuid,
        draft: &TaskDraft,
    ) -> Result<Self, TaskError> {
        let record = task::Entity::find()
            .filter(task::Column::Uuid.eq(id))
            .one(db)
            .await?
            .ok_or(TaskError::TaskNotFound)?;

        let owner_row_id = Self::owner_row_id(db, owner).await?;
        if record.user_id != owner_row_id {
            return Err(TaskError::NotTaskOwner);
        }

        let mut active: task::ActiveModel = record.into();
        active.title = Set(draft.title.clone());
        active.description = Set(draft.description.clone());
        active.status = Set(draft.status.clone());
        active.priority = Set(draft.priority.clone());
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(db).await?;
        Ok(Self::from_model(updated, owner))
    }

    pub async fn delete<C: ConnectionTrait>(
        db: &C,
        owner: Uuid,
        id: Uuid,
    ) -> Result<(), TaskError> {
        let record = task::Entity::find()
            .filter(task::Column::Uuid.eq(id))
            .one(db)
            .await?
            .ok_or(TaskError::TaskNotFound)?;

        let owner_row_id = Self::owner_row_id(db, owner).await?;
        if record.user_id != owner_row_id {
            return Err(TaskError::NotTaskOwner);
        }

        task::Entity::delete_many()
            .filter(task::Column::Uuid.eq(id))
            .exec(db)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;

    use super::*;
    use crate::models::user::{CreateUser, User};

    async fn setup_db() -> sea_orm::DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db_migration::Migrator::up(&db, None).await.unwrap();
        db
    }

    async fn seed_user(db: &sea_orm::DatabaseConnection, email: &str) -> User {
        User::create(
            db,
            &CreateUser {
                email: email.to_string(),
                name: "Test".to_string(),
                email_notifications: true,
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap()
    }

    fn draft(title: &str, status: &str, priority: &str) -> TaskDraft {
        TaskDraft::validate(Some(title), None, Some(status), Some(priority)).unwrap()
    }

    async fn seed_task(
        db: &sea_orm::DatabaseConnection,
        owner: Uuid,
        title: &str,
        status: &str,
    ) -> Task {
        Task::create(db, owner, &draft(title, status, "medium"), Uuid::new_v4())
            .await
            .unwrap()
    }

    #[test]
    fn validation_collects_every_violated_field() {
        let err = TaskDraft::validate(
            Some("   "),
            Some(&"d".repeat(501)),
            Some("done"),
            Some("urgent"),
        )
        .unwrap_err();

        let TaskError::Validation(issues) = err else {
            panic!("expected validation error");
        };
        let fields: Vec<&str> = issues.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "description", "status", "priority"]);
    }

    #[test]
    fn title_longer_than_limit_names_the_title_field() {
        let err = TaskDraft::validate(Some(&"x".repeat(101)), None, None, None).unwrap_err();
        let TaskError::Validation(issues) = err else {
            panic!("expected validation error");
        };
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "title");
    }

    #[test]
    fn validation_applies_defaults_and_trims() {
        let draft =
            TaskDraft::validate(Some("  Buy milk  "), Some("   "), None, None).unwrap();
        assert_eq!(draft.title, "Buy milk");
        assert_eq!(draft.description, None);
        assert_eq!(draft.status, TaskStatus::Pending);
        assert_eq!(draft.priority, TaskPriority::Medium);
    }

    #[test]
    fn pagination_normalizes_bad_input_to_defaults() {
        let page = Pagination::from_raw(Some("abc"), Some("-3"));
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, 10);

        let page = Pagination::from_raw(Some("0"), None);
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, 10);

        let page = Pagination::from_raw(Some("3"), Some("25"));
        assert_eq!(page.page, 3);
        assert_eq!(page.limit, 25);
    }

    #[test]
    fn update_merge_clears_description_on_empty_string() {
        let now = Utc::now();
        let existing = Task {
            id: Uuid::new_v4(),
            title: "Old".to_string(),
            description: Some("keep me".to_string()),
            status: TaskStatus::Pending,
            priority: TaskPriority::High,
            attachments: Vec::new(),
            owner: Uuid::new_v4(),
            order: 0,
            created_at: now,
            updated_at: now,
        };

        let keeps = UpdateTask {
            title: None,
            description: None,
            status: None,
            priority: None,
        }
        .merge_with(&existing)
        .unwrap();
        assert_eq!(keeps.title, "Old");
        assert_eq!(keeps.description.as_deref(), Some("keep me"));
        assert_eq!(keeps.priority, TaskPriority::High);

        let clears = UpdateTask {
            title: Some("New".to_string()),
            description: Some(String::new()),
            status: Some("completed".to_string()),
            priority: None,
        }
        .merge_with(&existing)
        .unwrap();
        assert_eq!(clears.title, "New");
        assert_eq!(clears.description, None);
        assert_eq!(clears.status, TaskStatus::Completed);
    }

    #[tokio::test]
    async fn status_filter_counts_only_matches() {
        let db = setup_db().await;
        let user = seed_user(&db, "a@example.com").await;

        seed_task(&db, user.id, "one", "pending").await;
        seed_task(&db, user.id, "two", "pending").await;
        seed_task(&db, user.id, "three", "completed").await;

        let page = Task::search_by_owner(
            &db,
            user.id,
            &TaskFilter {
                status: Some("pending".to_string()),
                ..Default::default()
            },
            Pagination::default(),
        )
        .await
        .unwrap();

        assert_eq!(page.tasks.len(), 2);
        assert_eq!(page.pagination.total, 2);
        assert!(page.tasks.iter().all(|t| t.status == TaskStatus::Pending));
    }

    #[tokio::test]
    async fn unknown_status_filter_matches_nothing() {
        let db = setup_db().await;
        let user = seed_user(&db, "a@example.com").await;
        seed_task(&db, user.id, "one", "pending").await;

        let page = Task::search_by_owner(
            &db,
            user.id,
            &TaskFilter {
                status: Some("bogus".to_string()),
                ..Default::default()
            },
            Pagination::default(),
        )
        .await
        .unwrap();
        assert_eq!(page.pagination.total, 0);
    }

    #[tokio::test]
    async fn search_matches_title_or_description_case_insensitively() {
        let db = setup_db().await;
        let user = seed_user(&db, "a@example.com").await;

        Task::create(
            &db,
            user.id,
            &TaskDraft::validate(Some("Groceries"), Some("buy MILK"), None, None).unwrap(),
            Uuid::new_v4(),
        )
        .await
        .unwrap();
        seed_task(&db, user.id, "Milk the cows", "pending").await;
        seed_task(&db, user.id, "Unrelated", "pending").await;

        for needle in ["milk", "MILK"] {
            let page = Task::search_by_owner(
                &db,
                user.id,
                &TaskFilter {
                    search: Some(needle.to_string()),
                    ..Default::default()
                },
                Pagination::default(),
            )
            .await
            .unwrap();
            assert_eq!(page.pagination.total, 2);
        }
    }

    #[tokio::test]
    async fn search_treats_like_metacharacters_literally() {
        let db = setup_db().await;
        let user = seed_user(&db, "a@example.com").await;

        seed_task(&db, user.id, "100% done", "pending").await;
        seed_task(&db, user.id, "100x done", "pending").await;
        seed_task(&db, user.id, "a_b", "pending").await;
        seed_task(&db, user.id, "axb", "pending").await;

        for (needle, expected) in [("0%", 1), ("a_b", 1), ("\\", 0)] {
            let page = Task::search_by_owner(
                &db,
                user.id,
                &TaskFilter {
                    search: Some(needle.to_string()),
                    ..Default::default()
                },
                Pagination::default(),
            )
            .await
            .unwrap();
            assert_eq!(page.pagination.total, expected, "needle {needle:?}");
        }
    }

    #[tokio::test]
    async fn absurd_page_numbers_yield_an_empty_page() {
        let db = setup_db().await;
        let user = seed_user(&db, "a@example.com").await;
        seed_task(&db, user.id, "only one", "pending").await;

        let page = Task::search_by_owner(
            &db,
            user.id,
            &TaskFilter::default(),
            Pagination {
                page: i64::MAX as u64,
                limit: 10,
            },
        )
        .await
        .unwrap();

        assert!(page.tasks.is_empty());
        assert_eq!(page.pagination.total, 1);
    }

    #[tokio::test]
    async fn lists_return_newest_first() {
        let db = setup_db().await;
        let user = seed_user(&db, "a@example.com").await;
        let owner_row = ids::user_id_by_uuid(&db, user.id)
            .await
            .unwrap()
            .expect("owner row id");

        // insertion order deliberately differs from timestamp order
        for (title, hours_ago) in [("oldest", 3i64), ("newest", 1), ("middle", 2)] {
            let at = Utc::now() - chrono::Duration::hours(hours_ago);
            let active = task::ActiveModel {
                uuid: Set(Uuid::new_v4()),
                user_id: Set(owner_row),
                title: Set(title.to_string()),
                description: Set(None),
                status: Set(TaskStatus::Pending),
                priority: Set(TaskPriority::Medium),
                attachments: Set(serde_json::Value::Array(Vec::new())),
                task_order: Set(0),
                created_at: Set(at.into()),
                updated_at: Set(at.into()),
                ..Default::default()
            };
            active.insert(&db).await.unwrap();
        }

        let page = Task::search_by_owner(
            &db,
            user.id,
            &TaskFilter::default(),
            Pagination::default(),
        )
        .await
        .unwrap();
        let titles: Vec<&str> = page.tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["newest", "middle", "oldest"]);

        let all = Task::find_all_by_owner(&db, user.id).await.unwrap();
        let titles: Vec<&str> = all.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["newest", "middle", "oldest"]);
    }

    #[tokio::test]
    async fn pagination_totals_and_last_page_remainder() {
        let db = setup_db().await;
        let user = seed_user(&db, "a@example.com").await;
        for i in 0..25 {
            seed_task(&db, user.id, &format!("task {i}"), "pending").await;
        }

        let page = Task::search_by_owner(
            &db,
            user.id,
            &TaskFilter::default(),
            Pagination { page: 3, limit: 10 },
        )
        .await
        .unwrap();

        assert_eq!(page.tasks.len(), 5);
        assert_eq!(page.pagination.total, 25);
        assert_eq!(page.pagination.pages, 3);
    }

    #[tokio::test]
    async fn queries_never_leak_other_owners_tasks() {
        let db = setup_db().await;
        let alice = seed_user(&db, "alice@example.com").await;
        let bob = seed_user(&db, "bob@example.com").await;

        seed_task(&db, alice.id, "alice task", "pending").await;
        let bobs = seed_task(&db, bob.id, "bob task", "pending").await;

        let page = Task::search_by_owner(
            &db,
            alice.id,
            &TaskFilter::default(),
            Pagination::default(),
        )
        .await
        .unwrap();
        assert_eq!(page.pagination.total, 1);
        assert!(page.tasks.iter().all(|t| t.id != bobs.id));

        let all = Task::find_all_by_owner(&db, alice.id).await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn non_owner_access_is_forbidden_not_notfound() {
        let db = setup_db().await;
        let alice = seed_user(&db, "alice@example.com").await;
        let bob = seed_user(&db, "bob@example.com").await;
        let task = seed_task(&db, bob.id, "bob task", "pending").await;

        let err = Task::find_owned(&db, alice.id, task.id).await.unwrap_err();
        assert!(matches!(err, TaskError::NotTaskOwner));

        let err = Task::delete(&db, alice.id, task.id).await.unwrap_err();
        assert!(matches!(err, TaskError::NotTaskOwner));

        let err = Task::find_owned(&db, alice.id, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, TaskError::TaskNotFound));
    }

    #[tokio::test]
    async fn owner_survives_update_unchanged() {
        let db = setup_db().await;
        let user = seed_user(&db, "a@example.com").await;
        let task = seed_task(&db, user.id, "mine", "pending").await;

        let updated = Task::update(
            &db,
            user.id,
            task.id,
            &draft("renamed", "in-progress", "high"),
        )
        .await
        .unwrap();

        assert_eq!(updated.owner, user.id);
        assert_eq!(updated.id, task.id);
        assert_eq!(updated.status, TaskStatus::InProgress);
        assert_eq!(updated.created_at, task.created_at);
    }

    #[tokio::test]
    async fn delete_removes_the_record() {
        let db = setup_db().await;
        let user = seed_user(&db, "a@example.com").await;
        let task = seed_task(&db, user.id, "short lived", "pending").await;

        Task::delete(&db, user.id, task.id).await.unwrap();

        let err = Task::find_owned(&db, user.id, task.id).await.unwrap_err();
        assert!(matches!(err, TaskError::TaskNotFound));
    }

    #[tokio::test]
    async fn new_tasks_start_with_empty_attachments_and_zero_order() {
        let db = setup_db().await;
        let user = seed_user(&db, "a@example.com").await;
        let task = seed_task(&db, user.id, "fresh", "pending").await;

        assert!(task.attachments.is_empty());
        assert_eq!(task.order, 0);
    }
}
