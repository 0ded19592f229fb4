use crate::api::attendance::{AttendanceEntry, MarkAttendanceReq, MarkAttendanceView};
use crate::api::report::{Defaulter, HomeReport, SubjectClassCount};
use crate::api::student::{
    NewStudent, StudentAttendanceRow, StudentsListResponse, SubjectAttendance,
};
use crate::api::subject::NewSubject;
use crate::model::student::Student;
use crate::model::subject::Subject;
use crate::models::LoginForm;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Student Attendance Register API",
        version = "1.0.0",
        description = r#"
## Student Attendance Register

Records per-subject student attendance for a single administrator and reports
attendance percentages, flagging students below the 75% threshold as
**defaulters**.

### 🔹 Key Features
- **Students & Subjects**
  - Register students (unique roll numbers) and subjects (unique names)
- **Attendance**
  - Mark a whole class in one submission, one date and subject at a time
- **Reports**
  - Per-subject class totals, defaulters list, per-student per-subject breakdown

### 🔐 Security
A single admin account authenticated by a **session cookie**; every content
route redirects anonymous browsers to `/login`.

### 📦 Response Format
Handlers return the view model as JSON; navigation flows answer with
`303 See Other` redirects.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::auth::handlers::login_page,
        crate::auth::handlers::login,
        crate::auth::handlers::logout,

        crate::api::report::home,

        crate::api::student::add_student_form,
        crate::api::student::add_student,
        crate::api::student::students_list,

        crate::api::subject::add_subject_form,
        crate::api::subject::add_subject,

        crate::api::attendance::mark_attendance_form,
        crate::api::attendance::mark_attendance
    ),
    components(
        schemas(
            LoginForm,
            Student,
            Subject,
            NewStudent,
            NewSubject,
            AttendanceEntry,
            MarkAttendanceReq,
            MarkAttendanceView,
            HomeReport,
            SubjectClassCount,
            Defaulter,
            StudentsListResponse,
            StudentAttendanceRow,
            SubjectAttendance
        )
    ),
    tags(
        (name = "Auth", description = "Session login/logout"),
        (name = "Reports", description = "Home report APIs"),
        (name = "Students", description = "Student management APIs"),
        (name = "Subjects", description = "Subject management APIs"),
        (name = "Attendance", description = "Attendance marking APIs"),
    )
)]
pub struct ApiDoc;
