use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Envelope wrapped around every successful JSON response.
#[derive(Serialize, Deserialize, Debug)]
pub struct ApiResponse<T> {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self::with_message("success", data)
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        ApiResponse {
            code: 200,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message_only(message: impl Into<String>) -> Self {
        ApiResponse {
            code: 200,
            message: message.into(),
            data: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
}

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub post_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CommentStatus {
    HasComments,
    NoComments,
}

impl CommentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommentStatus::HasComments => "has_comments",
            CommentStatus::NoComments => "no_comments",
        }
    }
}

impl TryFrom<&str> for CommentStatus {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "has_comments" => Ok(Self::HasComments),
            "no_comments" => Ok(Self::NoComments),
            other => Err(format!("{} is not a known comment status", other)),
        }
    }
}

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct PostEntity {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub user_id: i64,
    pub comment_status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub user_id: i64,
    pub comment_status: CommentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn from_entity(entity: PostEntity, user: Option<User>) -> Result<Self, String> {
        Ok(Post {
            id: entity.id,
            title: entity.title,
            content: entity.content,
            user_id: entity.user_id,
            comment_status: CommentStatus::try_from(entity.comment_status.as_str())?,
            user,
            comments: Vec::new(),
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct CommentEntity {
    pub id: i64,
    pub content: String,
    pub user_id: i64,
    pub post_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: i64,
    pub content: String,
    pub user_id: i64,
    pub post_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn from_entity(entity: CommentEntity, user: Option<User>) -> Self {
        Comment {
            id: entity.id,
            content: entity.content,
            user_id: entity.user_id,
            post_id: entity.post_id,
            user,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_page: i64,
}

impl PostPage {
    pub fn new(posts: Vec<Post>, total: i64, page: i64, page_size: i64) -> Self {
        PostPage {
            posts,
            total,
            page,
            page_size,
            total_page: (total + page_size - 1) / page_size,
        }
    }
}

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    pub id: i32,
    pub name: String,
    pub department: String,
    pub salary: i32,
}

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub price: f64,
}
