//! Student registry service

use validator::Validate;

use crate::{
    error::AppResult,
    models::{CreateStudent, NewStudent, Student},
    repository::SharedStore,
};

#[derive(Clone)]
pub struct StudentService {
    store: SharedStore,
}

impl StudentService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// List all students ordered by name
    pub async fn list_students(&self) -> AppResult<Vec<Student>> {
        self.store.list_students().await
    }

    pub async fn get_student(&self, id: i64) -> AppResult<Option<Student>> {
        self.store.get_student(id).await
    }

    /// Register a student. Email uniqueness is enforced by the store.
    pub async fn add_student(&self, data: CreateStudent) -> AppResult<Student> {
        let data = CreateStudent {
            name: data.name.trim().to_string(),
            email: data.email.trim().to_string(),
        };
        data.validate()?;

        let student = NewStudent {
            name: data.name,
            email: data.email,
        };

        let created = self.store.insert_student(&student).await?;
        tracing::info!(student_id = created.id, "Student registered");
        Ok(created)
    }
}
