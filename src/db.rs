use sqlx::mysql::MySqlPoolOptions;
use sqlx::{Executor, MySqlPool};
use tracing::info;

pub async fn init_db(database_url: &str) -> MySqlPool {
    MySqlPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
        .expect("Failed to connect to database")
}

/// Creates the three tables if absent and (re)installs both triggers.
///
/// Runs over the text protocol: MySQL refuses to prepare `CREATE TRIGGER`.
pub async fn ensure_schema(pool: &MySqlPool) -> anyhow::Result<()> {
    pool.execute(
        r#"
        CREATE TABLE IF NOT EXISTS students (
            id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            roll_no INT UNSIGNED NOT NULL UNIQUE,
            attendance_percentage DECIMAL(5, 2) NOT NULL DEFAULT 0
        )
        "#,
    )
    .await?;

    pool.execute(
        r#"
        CREATE TABLE IF NOT EXISTS subjects (
            id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
            name VARCHAR(255) NOT NULL UNIQUE
        )
        "#,
    )
    .await?;

    // One row per (student, subject, date); the unique key rejects a
    // duplicate row even when it slips past the handler-level pre-check.
    pool.execute(
        r#"
        CREATE TABLE IF NOT EXISTS attendance (
            id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
            student_id BIGINT UNSIGNED NOT NULL,
            subject_id BIGINT UNSIGNED NOT NULL,
            date DATE NOT NULL,
            status VARCHAR(50) NOT NULL,
            UNIQUE KEY uq_attendance_once (student_id, subject_id, date),
            FOREIGN KEY (student_id) REFERENCES students (id),
            FOREIGN KEY (subject_id) REFERENCES subjects (id)
        )
        "#,
    )
    .await?;

    // Student-level percentage is maintained here, across ALL subjects
    // combined, not per subject. The inserted row guarantees COUNT >= 1.
    pool.execute("DROP TRIGGER IF EXISTS update_student_attendance_percentage")
        .await?;
    pool.execute(
        r#"
        CREATE TRIGGER update_student_attendance_percentage
        AFTER INSERT ON attendance
        FOR EACH ROW
        UPDATE students
        SET attendance_percentage = (
            SELECT SUM(status = 'Present') * 100.0 / COUNT(id)
            FROM attendance
            WHERE student_id = NEW.student_id
        )
        WHERE id = NEW.student_id
        "#,
    )
    .await?;

    pool.execute("DROP TRIGGER IF EXISTS prevent_student_deletion")
        .await?;
    pool.execute(
        r#"
        CREATE TRIGGER prevent_student_deletion
        BEFORE DELETE ON students
        FOR EACH ROW
        BEGIN
            IF (SELECT COUNT(*) FROM attendance WHERE student_id = OLD.id) > 0 THEN
                SIGNAL SQLSTATE '45000'
                SET MESSAGE_TEXT = 'Cannot delete a student with attendance records';
            END IF;
        END
        "#,
    )
    .await?;

    info!("Database schema ready");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::env;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    async fn test_pool() -> MySqlPool {
        dotenvy::dotenv().ok();
        let url = env::var("DATABASE_URL").expect("DATABASE_URL must be set for database tests");
        let pool = MySqlPoolOptions::new()
            .max_connections(2)
            .connect(&url)
            .await
            .unwrap();
        ensure_schema(&pool).await.unwrap();
        pool
    }

    // Tables are shared across test runs, so every row gets a fresh roll
    // number / subject name
    fn unique_roll() -> u32 {
        static NEXT: AtomicU32 = AtomicU32::new(1);
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .subsec_nanos();
        1_000_000_000 + nanos + NEXT.fetch_add(1, Ordering::Relaxed)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn add_student(pool: &MySqlPool, name: &str) -> u64 {
        sqlx::query("INSERT INTO students (name, roll_no) VALUES (?, ?)")
            .bind(name)
            .bind(unique_roll())
            .execute(pool)
            .await
            .unwrap()
            .last_insert_id()
    }

    async fn add_subject(pool: &MySqlPool) -> u64 {
        sqlx::query("INSERT INTO subjects (name) VALUES (?)")
            .bind(format!("subject-{}", unique_roll()))
            .execute(pool)
            .await
            .unwrap()
            .last_insert_id()
    }

    async fn mark(
        pool: &MySqlPool,
        student_id: u64,
        subject_id: u64,
        date: NaiveDate,
        status: &str,
    ) -> sqlx::Result<()> {
        sqlx::query(
            "INSERT INTO attendance (student_id, subject_id, date, status) VALUES (?, ?, ?, ?)",
        )
        .bind(student_id)
        .bind(subject_id)
        .bind(date)
        .bind(status)
        .execute(pool)
        .await
        .map(|_| ())
    }

    async fn percentage(pool: &MySqlPool, student_id: u64) -> f64 {
        sqlx::query_scalar(
            "SELECT CAST(attendance_percentage AS DOUBLE) FROM students WHERE id = ?",
        )
        .bind(student_id)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    #[actix_web::test]
    #[ignore = "requires a MySQL server at DATABASE_URL"]
    async fn trigger_maintains_overall_present_ratio() {
        let pool = test_pool().await;
        let student = add_student(&pool, "Asha").await;
        let math = add_subject(&pool).await;

        mark(&pool, student, math, date(2024, 1, 1), "Present")
            .await
            .unwrap();
        assert!((percentage(&pool, student).await - 100.0).abs() < 0.01);

        mark(&pool, student, math, date(2024, 1, 2), "Absent")
            .await
            .unwrap();
        assert!((percentage(&pool, student).await - 50.0).abs() < 0.01);

        // Percentage spans ALL subjects combined: 2 of 3 present
        let physics = add_subject(&pool).await;
        mark(&pool, student, physics, date(2024, 1, 1), "Present")
            .await
            .unwrap();
        assert!((percentage(&pool, student).await - 66.67).abs() < 0.01);
    }

    #[actix_web::test]
    #[ignore = "requires a MySQL server at DATABASE_URL"]
    async fn unique_key_rejects_second_row_for_same_student_subject_date() {
        let pool = test_pool().await;
        let student = add_student(&pool, "Ravi").await;
        let subject = add_subject(&pool).await;

        mark(&pool, student, subject, date(2024, 1, 1), "Present")
            .await
            .unwrap();

        let err = mark(&pool, student, subject, date(2024, 1, 1), "Absent")
            .await
            .unwrap_err();
        match err {
            sqlx::Error::Database(db_err) => {
                assert_eq!(db_err.code().as_deref(), Some("23000"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[actix_web::test]
    #[ignore = "requires a MySQL server at DATABASE_URL"]
    async fn delete_guard_blocks_student_with_records() {
        let pool = test_pool().await;
        let student = add_student(&pool, "Meera").await;
        let subject = add_subject(&pool).await;

        mark(&pool, student, subject, date(2024, 1, 1), "Present")
            .await
            .unwrap();

        let err = sqlx::query("DELETE FROM students WHERE id = ?")
            .bind(student)
            .execute(&pool)
            .await
            .unwrap_err();
        match err {
            sqlx::Error::Database(db_err) => {
                assert_eq!(db_err.code().as_deref(), Some("45000"));
            }
            other => panic!("unexpected error: {other}"),
        }

        // With no attendance rows left the delete goes through
        sqlx::query("DELETE FROM attendance WHERE student_id = ?")
            .bind(student)
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("DELETE FROM students WHERE id = ?")
            .bind(student)
            .execute(&pool)
            .await
            .unwrap();
    }
}
