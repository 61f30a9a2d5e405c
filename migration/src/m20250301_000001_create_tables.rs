use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

/// 级联删除的外键
fn fk<T, C, R, RC>(from_table: T, from_col: C, to_table: R, to_col: RC) -> ForeignKeyCreateStatement
where
    T: IntoIden,
    C: IntoIden,
    R: IntoIden,
    RC: IntoIden,
{
    ForeignKey::create()
        .from(from_table, from_col)
        .to(to_table, to_col)
        .on_delete(ForeignKeyAction::Cascade)
        .to_owned()
}

fn index<T: IntoIden>(name: &str, table: T, cols: Vec<DynIden>, unique: bool) -> IndexCreateStatement {
    let mut stmt = Index::create();
    stmt.if_not_exists().name(name).table(table);
    for col in cols {
        stmt.col(col);
    }
    if unique {
        stmt.unique();
    }
    stmt.to_owned()
}

macro_rules! cols {
    ($($col:expr),+ $(,)?) => {
        vec![$($col.into_iden()),+]
    };
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 用户
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(string(Users::Id).primary_key())
                    .col(string_null(Users::Email).unique_key())
                    .col(string_null(Users::PhoneNumber).unique_key())
                    .col(string(Users::PasswordHash))
                    .col(string(Users::FirstName))
                    .col(string(Users::LastName))
                    .col(string_null(Users::Gender))
                    .col(string_null(Users::BirthDate))
                    .col(boolean(Users::IsInstitution).default(false))
                    .col(boolean(Users::IsTeacher).default(false))
                    .col(boolean(Users::IsStudent).default(false))
                    .col(boolean(Users::IsParents).default(false))
                    .col(boolean(Users::IsAdmissionSeeker).default(false))
                    .col(boolean(Users::IsActive).default(false))
                    .col(boolean(Users::IsStaff).default(false))
                    .col(big_integer(Users::CreatedAt))
                    .col(big_integer(Users::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // 机构
        manager
            .create_table(
                Table::create()
                    .table(Institutions::Table)
                    .if_not_exists()
                    .col(string(Institutions::Id).primary_key())
                    .col(string(Institutions::Name))
                    .col(text_null(Institutions::Description))
                    .col(string_null(Institutions::ShortCode).unique_key())
                    .col(string_null(Institutions::Address))
                    .col(string(Institutions::InstitutionType))
                    .col(boolean(Institutions::IsActive).default(true))
                    .col(string(Institutions::AdminId))
                    .col(big_integer(Institutions::CreatedAt))
                    .col(big_integer(Institutions::UpdatedAt))
                    .foreign_key(&mut fk(
                        Institutions::Table,
                        Institutions::AdminId,
                        Users::Table,
                        Users::Id,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(InstitutionMemberships::Table)
                    .if_not_exists()
                    .col(string(InstitutionMemberships::Id).primary_key())
                    .col(string(InstitutionMemberships::InstitutionId))
                    .col(string(InstitutionMemberships::UserId))
                    .col(string(InstitutionMemberships::Role))
                    .col(big_integer(InstitutionMemberships::CreatedAt))
                    .foreign_key(&mut fk(
                        InstitutionMemberships::Table,
                        InstitutionMemberships::InstitutionId,
                        Institutions::Table,
                        Institutions::Id,
                    ))
                    .foreign_key(&mut fk(
                        InstitutionMemberships::Table,
                        InstitutionMemberships::UserId,
                        Users::Table,
                        Users::Id,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Invitations::Table)
                    .if_not_exists()
                    .col(string(Invitations::Id).primary_key())
                    .col(string(Invitations::InstitutionId))
                    .col(string_null(Invitations::Email))
                    .col(string_null(Invitations::PhoneNumber))
                    .col(string(Invitations::Role))
                    .col(string_uniq(Invitations::Token))
                    .col(string(Invitations::InvitedBy))
                    .col(boolean(Invitations::IsUsed).default(false))
                    .col(big_integer(Invitations::ExpiresAt))
                    .col(big_integer(Invitations::CreatedAt))
                    .foreign_key(&mut fk(
                        Invitations::Table,
                        Invitations::InstitutionId,
                        Institutions::Table,
                        Institutions::Id,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ParentChildRelationships::Table)
                    .if_not_exists()
                    .col(string(ParentChildRelationships::Id).primary_key())
                    .col(string(ParentChildRelationships::ParentId))
                    .col(string(ParentChildRelationships::ChildId))
                    .col(big_integer(ParentChildRelationships::CreatedAt))
                    .foreign_key(&mut fk(
                        ParentChildRelationships::Table,
                        ParentChildRelationships::ParentId,
                        Users::Table,
                        Users::Id,
                    ))
                    .foreign_key(&mut fk(
                        ParentChildRelationships::Table,
                        ParentChildRelationships::ChildId,
                        Users::Table,
                        Users::Id,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AdmissionRequests::Table)
                    .if_not_exists()
                    .col(string(AdmissionRequests::Id).primary_key())
                    .col(string(AdmissionRequests::UserId))
                    .col(string(AdmissionRequests::InstitutionId))
                    .col(string(AdmissionRequests::Status))
                    .col(text_null(AdmissionRequests::Message))
                    .col(string_null(AdmissionRequests::ProcessedBy))
                    .col(big_integer(AdmissionRequests::CreatedAt))
                    .col(big_integer(AdmissionRequests::UpdatedAt))
                    .foreign_key(&mut fk(
                        AdmissionRequests::Table,
                        AdmissionRequests::UserId,
                        Users::Table,
                        Users::Id,
                    ))
                    .foreign_key(&mut fk(
                        AdmissionRequests::Table,
                        AdmissionRequests::InstitutionId,
                        Institutions::Table,
                        Institutions::Id,
                    ))
                    .to_owned(),
            )
            .await?;

        // 课程目录
        manager
            .create_table(
                Table::create()
                    .table(GlobalCurriculumItems::Table)
                    .if_not_exists()
                    .col(string(GlobalCurriculumItems::Id).primary_key())
                    .col(string(GlobalCurriculumItems::Level))
                    .col(string(GlobalCurriculumItems::Name))
                    .col(string_null(GlobalCurriculumItems::Code))
                    .col(text_null(GlobalCurriculumItems::Description))
                    .col(text_null(GlobalCurriculumItems::Content))
                    .col(string_null(GlobalCurriculumItems::ContentType))
                    .col(string_null(GlobalCurriculumItems::VideoUrl))
                    .col(string_null(GlobalCurriculumItems::ImageUrl))
                    .col(string(GlobalCurriculumItems::InstitutionType))
                    .col(boolean(GlobalCurriculumItems::IsActive).default(true))
                    .col(big_integer(GlobalCurriculumItems::CreatedAt))
                    .col(big_integer(GlobalCurriculumItems::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // section_id 与 sections 互相引用，这里只建索引
        manager
            .create_table(
                Table::create()
                    .table(CurriculumNodes::Table)
                    .if_not_exists()
                    .col(string(CurriculumNodes::Id).primary_key())
                    .col(string(CurriculumNodes::InstitutionId))
                    .col(string(CurriculumNodes::Level))
                    .col(string_null(CurriculumNodes::ParentId))
                    .col(string(CurriculumNodes::TrackId))
                    .col(string_null(CurriculumNodes::SectionId))
                    .col(string(CurriculumNodes::GlobalItemId))
                    .col(string(CurriculumNodes::Name))
                    .col(integer(CurriculumNodes::SortOrder).default(0))
                    .col(boolean(CurriculumNodes::IsActive).default(true))
                    .col(big_integer(CurriculumNodes::CreatedAt))
                    .col(big_integer(CurriculumNodes::UpdatedAt))
                    .foreign_key(&mut fk(
                        CurriculumNodes::Table,
                        CurriculumNodes::InstitutionId,
                        Institutions::Table,
                        Institutions::Id,
                    ))
                    .foreign_key(&mut fk(
                        CurriculumNodes::Table,
                        CurriculumNodes::ParentId,
                        CurriculumNodes::Table,
                        CurriculumNodes::Id,
                    ))
                    .foreign_key(&mut fk(
                        CurriculumNodes::Table,
                        CurriculumNodes::GlobalItemId,
                        GlobalCurriculumItems::Table,
                        GlobalCurriculumItems::Id,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Sections::Table)
                    .if_not_exists()
                    .col(string(Sections::Id).primary_key())
                    .col(string(Sections::InstitutionId))
                    .col(string(Sections::TrackId))
                    .col(string(Sections::Name))
                    .col(integer(Sections::SortOrder).default(0))
                    .col(boolean(Sections::IsActive).default(true))
                    .col(big_integer(Sections::CreatedAt))
                    .col(big_integer(Sections::UpdatedAt))
                    .foreign_key(&mut fk(
                        Sections::Table,
                        Sections::InstitutionId,
                        Institutions::Table,
                        Institutions::Id,
                    ))
                    .foreign_key(&mut fk(
                        Sections::Table,
                        Sections::TrackId,
                        CurriculumNodes::Table,
                        CurriculumNodes::Id,
                    ))
                    .to_owned(),
            )
            .await?;

        // 授课与入学
        manager
            .create_table(
                Table::create()
                    .table(TeacherEnrollments::Table)
                    .if_not_exists()
                    .col(string(TeacherEnrollments::Id).primary_key())
                    .col(string(TeacherEnrollments::InstitutionId))
                    .col(string(TeacherEnrollments::UserId))
                    .col(boolean(TeacherEnrollments::IsActive).default(true))
                    .col(big_integer(TeacherEnrollments::CreatedAt))
                    .col(big_integer(TeacherEnrollments::UpdatedAt))
                    .foreign_key(&mut fk(
                        TeacherEnrollments::Table,
                        TeacherEnrollments::InstitutionId,
                        Institutions::Table,
                        Institutions::Id,
                    ))
                    .foreign_key(&mut fk(
                        TeacherEnrollments::Table,
                        TeacherEnrollments::UserId,
                        Users::Table,
                        Users::Id,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TeacherEnrollmentLinks::Table)
                    .if_not_exists()
                    .col(string(TeacherEnrollmentLinks::Id).primary_key())
                    .col(string(TeacherEnrollmentLinks::EnrollmentId))
                    .col(string(TeacherEnrollmentLinks::TargetKind))
                    .col(string(TeacherEnrollmentLinks::TargetId))
                    .foreign_key(&mut fk(
                        TeacherEnrollmentLinks::Table,
                        TeacherEnrollmentLinks::EnrollmentId,
                        TeacherEnrollments::Table,
                        TeacherEnrollments::Id,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(StudentEnrollments::Table)
                    .if_not_exists()
                    .col(string(StudentEnrollments::Id).primary_key())
                    .col(string(StudentEnrollments::InstitutionId))
                    .col(string(StudentEnrollments::UserId))
                    .col(string(StudentEnrollments::TrackId))
                    .col(string(StudentEnrollments::SectionId))
                    .col(boolean(StudentEnrollments::IsActive).default(true))
                    .col(big_integer(StudentEnrollments::CreatedAt))
                    .col(big_integer(StudentEnrollments::UpdatedAt))
                    .foreign_key(&mut fk(
                        StudentEnrollments::Table,
                        StudentEnrollments::InstitutionId,
                        Institutions::Table,
                        Institutions::Id,
                    ))
                    .foreign_key(&mut fk(
                        StudentEnrollments::Table,
                        StudentEnrollments::UserId,
                        Users::Table,
                        Users::Id,
                    ))
                    .foreign_key(&mut fk(
                        StudentEnrollments::Table,
                        StudentEnrollments::SectionId,
                        Sections::Table,
                        Sections::Id,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FeeSettings::Table)
                    .if_not_exists()
                    .col(string(FeeSettings::Id).primary_key())
                    .col(string(FeeSettings::InstitutionId))
                    .col(string(FeeSettings::Scope))
                    .col(string(FeeSettings::TargetId))
                    .col(big_integer(FeeSettings::AmountMinor))
                    .col(big_integer(FeeSettings::CreatedAt))
                    .col(big_integer(FeeSettings::UpdatedAt))
                    .foreign_key(&mut fk(
                        FeeSettings::Table,
                        FeeSettings::InstitutionId,
                        Institutions::Table,
                        Institutions::Id,
                    ))
                    .to_owned(),
            )
            .await?;

        // 考勤
        manager
            .create_table(
                Table::create()
                    .table(Attendances::Table)
                    .if_not_exists()
                    .col(string(Attendances::Id).primary_key())
                    .col(string(Attendances::InstitutionId))
                    .col(string(Attendances::StudentId))
                    .col(string(Attendances::SectionId))
                    .col(string(Attendances::SubjectId))
                    .col(string(Attendances::Date))
                    .col(string(Attendances::Status))
                    .col(string(Attendances::CreatedBy))
                    .col(big_integer(Attendances::CreatedAt))
                    .col(big_integer(Attendances::UpdatedAt))
                    .foreign_key(&mut fk(
                        Attendances::Table,
                        Attendances::StudentId,
                        Users::Table,
                        Users::Id,
                    ))
                    .foreign_key(&mut fk(
                        Attendances::Table,
                        Attendances::SectionId,
                        Sections::Table,
                        Sections::Id,
                    ))
                    .foreign_key(&mut fk(
                        Attendances::Table,
                        Attendances::SubjectId,
                        CurriculumNodes::Table,
                        CurriculumNodes::Id,
                    ))
                    .to_owned(),
            )
            .await?;

        // 题库与测验
        manager
            .create_table(
                Table::create()
                    .table(QuizQuestions::Table)
                    .if_not_exists()
                    .col(string(QuizQuestions::Id).primary_key())
                    .col(string(QuizQuestions::TrackId))
                    .col(string(QuizQuestions::StreamId))
                    .col(string(QuizQuestions::SubjectId))
                    .col(string(QuizQuestions::ModuleId))
                    .col(string(QuizQuestions::UnitId))
                    .col(string_null(QuizQuestions::LessonId))
                    .col(string_null(QuizQuestions::MicroLessonId))
                    .col(string(QuizQuestions::QuestionType))
                    .col(text(QuizQuestions::Text))
                    .col(string_null(QuizQuestions::ImageUrl))
                    .col(double(QuizQuestions::Marks).default(1.0))
                    .col(string(QuizQuestions::Status))
                    .col(string(QuizQuestions::CreatedBy))
                    .col(big_integer(QuizQuestions::CreatedAt))
                    .col(big_integer(QuizQuestions::UpdatedAt))
                    .foreign_key(&mut fk(
                        QuizQuestions::Table,
                        QuizQuestions::CreatedBy,
                        Users::Table,
                        Users::Id,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(QuizOptions::Table)
                    .if_not_exists()
                    .col(string(QuizOptions::Id).primary_key())
                    .col(string(QuizOptions::QuestionId))
                    .col(string(QuizOptions::Label))
                    .col(text(QuizOptions::Text))
                    .col(boolean(QuizOptions::IsCorrect).default(false))
                    .foreign_key(&mut fk(
                        QuizOptions::Table,
                        QuizOptions::QuestionId,
                        QuizQuestions::Table,
                        QuizQuestions::Id,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Quizzes::Table)
                    .if_not_exists()
                    .col(string(Quizzes::Id).primary_key())
                    .col(string(Quizzes::InstitutionId))
                    .col(string(Quizzes::TrackId))
                    .col(string_null(Quizzes::SectionId))
                    .col(string_null(Quizzes::StreamId))
                    .col(string(Quizzes::SubjectId))
                    .col(string_null(Quizzes::ModuleId))
                    .col(string_null(Quizzes::UnitId))
                    .col(string_null(Quizzes::LessonId))
                    .col(string_null(Quizzes::MicroLessonId))
                    .col(string(Quizzes::Title))
                    .col(big_integer_null(Quizzes::StartTime))
                    .col(big_integer_null(Quizzes::EndTime))
                    .col(integer_null(Quizzes::TimerPerQuestion))
                    .col(boolean(Quizzes::EnableNegativeMarking).default(false))
                    .col(double_null(Quizzes::NegativeMarks))
                    .col(string(Quizzes::Status))
                    .col(boolean(Quizzes::IsFree).default(false))
                    .col(boolean(Quizzes::IsActive).default(true))
                    .col(integer(Quizzes::SortOrder).default(0))
                    .col(string(Quizzes::CreatedBy))
                    .col(big_integer(Quizzes::CreatedAt))
                    .col(big_integer(Quizzes::UpdatedAt))
                    .foreign_key(&mut fk(
                        Quizzes::Table,
                        Quizzes::InstitutionId,
                        Institutions::Table,
                        Institutions::Id,
                    ))
                    .foreign_key(&mut fk(
                        Quizzes::Table,
                        Quizzes::CreatedBy,
                        Users::Table,
                        Users::Id,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(QuizItems::Table)
                    .if_not_exists()
                    .col(string(QuizItems::Id).primary_key())
                    .col(string(QuizItems::QuizId))
                    .col(string(QuizItems::QuestionId))
                    .col(integer(QuizItems::SortOrder).default(0))
                    .foreign_key(&mut fk(
                        QuizItems::Table,
                        QuizItems::QuizId,
                        Quizzes::Table,
                        Quizzes::Id,
                    ))
                    .foreign_key(&mut fk(
                        QuizItems::Table,
                        QuizItems::QuestionId,
                        QuizQuestions::Table,
                        QuizQuestions::Id,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(QuizAttempts::Table)
                    .if_not_exists()
                    .col(string(QuizAttempts::Id).primary_key())
                    .col(string(QuizAttempts::QuizId))
                    .col(string(QuizAttempts::StudentId))
                    .col(string(QuizAttempts::InstitutionId))
                    .col(string(QuizAttempts::Status))
                    .col(double(QuizAttempts::Score).default(0.0))
                    .col(big_integer(QuizAttempts::StartedAt))
                    .col(big_integer_null(QuizAttempts::CompletedAt))
                    .foreign_key(&mut fk(
                        QuizAttempts::Table,
                        QuizAttempts::QuizId,
                        Quizzes::Table,
                        Quizzes::Id,
                    ))
                    .foreign_key(&mut fk(
                        QuizAttempts::Table,
                        QuizAttempts::StudentId,
                        Users::Table,
                        Users::Id,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(QuizResponses::Table)
                    .if_not_exists()
                    .col(string(QuizResponses::Id).primary_key())
                    .col(string(QuizResponses::AttemptId))
                    .col(string(QuizResponses::QuestionId))
                    .col(string_null(QuizResponses::SelectedOption))
                    .col(text_null(QuizResponses::ShortAnswer))
                    .col(boolean_null(QuizResponses::IsCorrect))
                    .col(double_null(QuizResponses::ManualScore))
                    .col(big_integer(QuizResponses::CreatedAt))
                    .foreign_key(&mut fk(
                        QuizResponses::Table,
                        QuizResponses::AttemptId,
                        QuizAttempts::Table,
                        QuizAttempts::Id,
                    ))
                    .foreign_key(&mut fk(
                        QuizResponses::Table,
                        QuizResponses::QuestionId,
                        QuizQuestions::Table,
                        QuizQuestions::Id,
                    ))
                    .to_owned(),
            )
            .await?;

        // 作业
        manager
            .create_table(
                Table::create()
                    .table(Homeworks::Table)
                    .if_not_exists()
                    .col(string(Homeworks::Id).primary_key())
                    .col(string(Homeworks::InstitutionId))
                    .col(string(Homeworks::TrackId))
                    .col(string(Homeworks::SectionId))
                    .col(string(Homeworks::SubjectId))
                    .col(string(Homeworks::Title))
                    .col(text_null(Homeworks::Description))
                    .col(string(Homeworks::DueDate))
                    .col(string(Homeworks::CreatedBy))
                    .col(boolean(Homeworks::IsActive).default(true))
                    .col(big_integer(Homeworks::CreatedAt))
                    .col(big_integer(Homeworks::UpdatedAt))
                    .foreign_key(&mut fk(
                        Homeworks::Table,
                        Homeworks::SectionId,
                        Sections::Table,
                        Sections::Id,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(HomeworkSubmissions::Table)
                    .if_not_exists()
                    .col(string(HomeworkSubmissions::Id).primary_key())
                    .col(string(HomeworkSubmissions::HomeworkId))
                    .col(string(HomeworkSubmissions::StudentId))
                    .col(boolean(HomeworkSubmissions::Submitted).default(false))
                    .col(string_null(HomeworkSubmissions::SubmissionDate))
                    .col(string(HomeworkSubmissions::UpdatedBy))
                    .col(big_integer(HomeworkSubmissions::CreatedAt))
                    .col(big_integer(HomeworkSubmissions::UpdatedAt))
                    .foreign_key(&mut fk(
                        HomeworkSubmissions::Table,
                        HomeworkSubmissions::HomeworkId,
                        Homeworks::Table,
                        Homeworks::Id,
                    ))
                    .foreign_key(&mut fk(
                        HomeworkSubmissions::Table,
                        HomeworkSubmissions::StudentId,
                        Users::Table,
                        Users::Id,
                    ))
                    .to_owned(),
            )
            .await?;

        // 考试
        manager
            .create_table(
                Table::create()
                    .table(Exams::Table)
                    .if_not_exists()
                    .col(string(Exams::Id).primary_key())
                    .col(string(Exams::InstitutionId))
                    .col(string(Exams::TrackId))
                    .col(string(Exams::SectionId))
                    .col(string(Exams::SubjectId))
                    .col(string(Exams::Title))
                    .col(string(Exams::ExamType))
                    .col(string(Exams::ExamDate))
                    .col(double(Exams::TotalMarks))
                    .col(boolean(Exams::IsActive).default(true))
                    .col(string(Exams::CreatedBy))
                    .col(big_integer(Exams::CreatedAt))
                    .col(big_integer(Exams::UpdatedAt))
                    .foreign_key(&mut fk(
                        Exams::Table,
                        Exams::SectionId,
                        Sections::Table,
                        Sections::Id,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ExamMarks::Table)
                    .if_not_exists()
                    .col(string(ExamMarks::Id).primary_key())
                    .col(string(ExamMarks::ExamId))
                    .col(string(ExamMarks::StudentId))
                    .col(double(ExamMarks::MarksObtained))
                    .col(text_null(ExamMarks::Remarks))
                    .col(string(ExamMarks::CreatedBy))
                    .col(big_integer(ExamMarks::CreatedAt))
                    .col(big_integer(ExamMarks::UpdatedAt))
                    .foreign_key(&mut fk(
                        ExamMarks::Table,
                        ExamMarks::ExamId,
                        Exams::Table,
                        Exams::Id,
                    ))
                    .foreign_key(&mut fk(
                        ExamMarks::Table,
                        ExamMarks::StudentId,
                        Users::Table,
                        Users::Id,
                    ))
                    .to_owned(),
            )
            .await?;

        // 教学大纲
        manager
            .create_table(
                Table::create()
                    .table(Syllabi::Table)
                    .if_not_exists()
                    .col(string(Syllabi::Id).primary_key())
                    .col(string(Syllabi::InstitutionId))
                    .col(string(Syllabi::TrackId))
                    .col(string(Syllabi::SectionId))
                    .col(string(Syllabi::SubjectId))
                    .col(string(Syllabi::Title))
                    .col(string(Syllabi::Purpose))
                    .col(string(Syllabi::CreatedBy))
                    .col(boolean(Syllabi::IsActive).default(true))
                    .col(big_integer(Syllabi::CreatedAt))
                    .col(big_integer(Syllabi::UpdatedAt))
                    .foreign_key(&mut fk(
                        Syllabi::Table,
                        Syllabi::SectionId,
                        Sections::Table,
                        Sections::Id,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SyllabusItems::Table)
                    .if_not_exists()
                    .col(string(SyllabusItems::Id).primary_key())
                    .col(string(SyllabusItems::SyllabusId))
                    .col(string(SyllabusItems::NodeId))
                    .foreign_key(&mut fk(
                        SyllabusItems::Table,
                        SyllabusItems::SyllabusId,
                        Syllabi::Table,
                        Syllabi::Id,
                    ))
                    .foreign_key(&mut fk(
                        SyllabusItems::Table,
                        SyllabusItems::NodeId,
                        CurriculumNodes::Table,
                        CurriculumNodes::Id,
                    ))
                    .to_owned(),
            )
            .await?;

        // 通知与奖学金
        manager
            .create_table(
                Table::create()
                    .table(Notices::Table)
                    .if_not_exists()
                    .col(string(Notices::Id).primary_key())
                    .col(string(Notices::InstitutionId))
                    .col(string(Notices::Title))
                    .col(text(Notices::Content))
                    .col(string(Notices::TargetAudience))
                    .col(string(Notices::NoticeType))
                    .col(string(Notices::CreatedBy))
                    .col(boolean(Notices::IsActive).default(true))
                    .col(big_integer(Notices::CreatedAt))
                    .col(big_integer(Notices::UpdatedAt))
                    .foreign_key(&mut fk(
                        Notices::Table,
                        Notices::InstitutionId,
                        Institutions::Table,
                        Institutions::Id,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Scholarships::Table)
                    .if_not_exists()
                    .col(string(Scholarships::Id).primary_key())
                    .col(string(Scholarships::InstitutionId))
                    .col(string(Scholarships::StudentEnrollmentId))
                    .col(big_integer(Scholarships::PercentageHundredths))
                    .col(boolean(Scholarships::IsActive).default(true))
                    .col(big_integer(Scholarships::CreatedAt))
                    .col(big_integer(Scholarships::UpdatedAt))
                    .foreign_key(&mut fk(
                        Scholarships::Table,
                        Scholarships::InstitutionId,
                        Institutions::Table,
                        Institutions::Id,
                    ))
                    .foreign_key(&mut fk(
                        Scholarships::Table,
                        Scholarships::StudentEnrollmentId,
                        StudentEnrollments::Table,
                        StudentEnrollments::Id,
                    ))
                    .to_owned(),
            )
            .await?;

        // 支付
        manager
            .create_table(
                Table::create()
                    .table(BkashPayments::Table)
                    .if_not_exists()
                    .col(string(BkashPayments::Id).primary_key())
                    .col(string_uniq(BkashPayments::PaymentId))
                    .col(string(BkashPayments::InvoiceNumber))
                    .col(big_integer(BkashPayments::AmountMinor))
                    .col(string(BkashPayments::Status))
                    .col(string_null(BkashPayments::TrxId))
                    .col(string(BkashPayments::PayerId))
                    .col(big_integer(BkashPayments::CreatedAt))
                    .col(big_integer(BkashPayments::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(StudentFeePayments::Table)
                    .if_not_exists()
                    .col(string(StudentFeePayments::Id).primary_key())
                    .col(string(StudentFeePayments::EnrollmentId))
                    .col(string(StudentFeePayments::InstitutionId))
                    .col(string(StudentFeePayments::BkashPaymentId))
                    .col(big_integer(StudentFeePayments::AmountMinor))
                    .col(string(StudentFeePayments::Month))
                    .col(string(StudentFeePayments::Status))
                    .col(boolean(StudentFeePayments::ScholarshipApplied).default(false))
                    .col(big_integer(StudentFeePayments::ScholarshipMinor).default(0))
                    .col(string(StudentFeePayments::PaidBy))
                    .col(big_integer(StudentFeePayments::CreatedAt))
                    .col(big_integer(StudentFeePayments::UpdatedAt))
                    .foreign_key(&mut fk(
                        StudentFeePayments::Table,
                        StudentFeePayments::EnrollmentId,
                        StudentEnrollments::Table,
                        StudentEnrollments::Id,
                    ))
                    .foreign_key(&mut fk(
                        StudentFeePayments::Table,
                        StudentFeePayments::BkashPaymentId,
                        BkashPayments::Table,
                        BkashPayments::Id,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(InstitutionPaymentTrackers::Table)
                    .if_not_exists()
                    .col(string(InstitutionPaymentTrackers::Id).primary_key())
                    .col(string(InstitutionPaymentTrackers::InstitutionId))
                    .col(string_uniq(InstitutionPaymentTrackers::FeePaymentId))
                    .col(big_integer(InstitutionPaymentTrackers::AmountMinor))
                    .col(boolean(InstitutionPaymentTrackers::IsDisbursed).default(false))
                    .col(big_integer_null(InstitutionPaymentTrackers::DisbursedAt))
                    .col(big_integer(InstitutionPaymentTrackers::CreatedAt))
                    .foreign_key(&mut fk(
                        InstitutionPaymentTrackers::Table,
                        InstitutionPaymentTrackers::InstitutionId,
                        Institutions::Table,
                        Institutions::Id,
                    ))
                    .foreign_key(&mut fk(
                        InstitutionPaymentTrackers::Table,
                        InstitutionPaymentTrackers::FeePaymentId,
                        StudentFeePayments::Table,
                        StudentFeePayments::Id,
                    ))
                    .to_owned(),
            )
            .await?;

        // 唯一约束与查询索引
        let indexes = vec![
            index(
                "uq_memberships_institution_user_role",
                InstitutionMemberships::Table,
                cols![
                    InstitutionMemberships::InstitutionId,
                    InstitutionMemberships::UserId,
                    InstitutionMemberships::Role
                ],
                true,
            ),
            index(
                "idx_memberships_user",
                InstitutionMemberships::Table,
                cols![InstitutionMemberships::UserId],
                false,
            ),
            index(
                "uq_parent_child",
                ParentChildRelationships::Table,
                cols![
                    ParentChildRelationships::ParentId,
                    ParentChildRelationships::ChildId
                ],
                true,
            ),
            index(
                "idx_admission_requests_institution_status",
                AdmissionRequests::Table,
                cols![AdmissionRequests::InstitutionId, AdmissionRequests::Status],
                false,
            ),
            index(
                "idx_global_items_level",
                GlobalCurriculumItems::Table,
                cols![GlobalCurriculumItems::Level],
                false,
            ),
            index(
                "idx_nodes_institution_level",
                CurriculumNodes::Table,
                cols![CurriculumNodes::InstitutionId, CurriculumNodes::Level],
                false,
            ),
            index(
                "idx_nodes_parent",
                CurriculumNodes::Table,
                cols![CurriculumNodes::ParentId],
                false,
            ),
            index(
                "idx_nodes_section",
                CurriculumNodes::Table,
                cols![CurriculumNodes::SectionId],
                false,
            ),
            index(
                "uq_sections_track_name",
                Sections::Table,
                cols![Sections::TrackId, Sections::Name],
                true,
            ),
            index(
                "uq_teacher_enrollment_links",
                TeacherEnrollmentLinks::Table,
                cols![
                    TeacherEnrollmentLinks::EnrollmentId,
                    TeacherEnrollmentLinks::TargetKind,
                    TeacherEnrollmentLinks::TargetId
                ],
                true,
            ),
            index(
                "uq_student_enrollments",
                StudentEnrollments::Table,
                cols![
                    StudentEnrollments::UserId,
                    StudentEnrollments::TrackId,
                    StudentEnrollments::SectionId
                ],
                true,
            ),
            index(
                "uq_fee_settings_scope_target",
                FeeSettings::Table,
                cols![FeeSettings::Scope, FeeSettings::TargetId],
                true,
            ),
            index(
                "uq_attendance_student_day",
                Attendances::Table,
                cols![
                    Attendances::StudentId,
                    Attendances::SectionId,
                    Attendances::SubjectId,
                    Attendances::Date
                ],
                true,
            ),
            index(
                "idx_attendance_section_subject_date",
                Attendances::Table,
                cols![
                    Attendances::SectionId,
                    Attendances::SubjectId,
                    Attendances::Date
                ],
                false,
            ),
            index(
                "uq_quiz_options_label",
                QuizOptions::Table,
                cols![QuizOptions::QuestionId, QuizOptions::Label],
                true,
            ),
            index(
                "uq_quiz_items",
                QuizItems::Table,
                cols![QuizItems::QuizId, QuizItems::QuestionId],
                true,
            ),
            index(
                "idx_quiz_attempts_quiz_student",
                QuizAttempts::Table,
                cols![QuizAttempts::QuizId, QuizAttempts::StudentId],
                false,
            ),
            index(
                "uq_quiz_responses",
                QuizResponses::Table,
                cols![QuizResponses::AttemptId, QuizResponses::QuestionId],
                true,
            ),
            index(
                "uq_homework_submissions",
                HomeworkSubmissions::Table,
                cols![
                    HomeworkSubmissions::HomeworkId,
                    HomeworkSubmissions::StudentId
                ],
                true,
            ),
            index(
                "uq_exam_marks",
                ExamMarks::Table,
                cols![ExamMarks::ExamId, ExamMarks::StudentId],
                true,
            ),
            index(
                "uq_syllabus_items",
                SyllabusItems::Table,
                cols![SyllabusItems::SyllabusId, SyllabusItems::NodeId],
                true,
            ),
            index(
                "uq_scholarships_enrollment",
                Scholarships::Table,
                cols![
                    Scholarships::InstitutionId,
                    Scholarships::StudentEnrollmentId
                ],
                true,
            ),
            index(
                "idx_fee_payments_enrollment_month",
                StudentFeePayments::Table,
                cols![StudentFeePayments::EnrollmentId, StudentFeePayments::Month],
                false,
            ),
        ];
        for stmt in indexes {
            manager.create_index(stmt).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        let tables: Vec<DynIden> = cols![
            InstitutionPaymentTrackers::Table,
            StudentFeePayments::Table,
            BkashPayments::Table,
            Scholarships::Table,
            Notices::Table,
            SyllabusItems::Table,
            Syllabi::Table,
            ExamMarks::Table,
            Exams::Table,
            HomeworkSubmissions::Table,
            Homeworks::Table,
            QuizResponses::Table,
            QuizAttempts::Table,
            QuizItems::Table,
            Quizzes::Table,
            QuizOptions::Table,
            QuizQuestions::Table,
            Attendances::Table,
            FeeSettings::Table,
            StudentEnrollments::Table,
            TeacherEnrollmentLinks::Table,
            TeacherEnrollments::Table,
            Sections::Table,
            CurriculumNodes::Table,
            GlobalCurriculumItems::Table,
            AdmissionRequests::Table,
            ParentChildRelationships::Table,
            Invitations::Table,
            InstitutionMemberships::Table,
            Institutions::Table,
            Users::Table,
        ];
        for table in tables {
            manager
                .drop_table(Table::drop().table(table).if_exists().to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Email,
    PhoneNumber,
    PasswordHash,
    FirstName,
    LastName,
    Gender,
    BirthDate,
    IsInstitution,
    IsTeacher,
    IsStudent,
    IsParents,
    IsAdmissionSeeker,
    IsActive,
    IsStaff,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Institutions {
    #[sea_orm(iden = "institutions")]
    Table,
    Id,
    Name,
    Description,
    ShortCode,
    Address,
    InstitutionType,
    IsActive,
    AdminId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum InstitutionMemberships {
    #[sea_orm(iden = "institution_memberships")]
    Table,
    Id,
    InstitutionId,
    UserId,
    Role,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Invitations {
    #[sea_orm(iden = "invitations")]
    Table,
    Id,
    InstitutionId,
    Email,
    PhoneNumber,
    Role,
    Token,
    InvitedBy,
    IsUsed,
    ExpiresAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ParentChildRelationships {
    #[sea_orm(iden = "parent_child_relationships")]
    Table,
    Id,
    ParentId,
    ChildId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum AdmissionRequests {
    #[sea_orm(iden = "admission_requests")]
    Table,
    Id,
    UserId,
    InstitutionId,
    Status,
    Message,
    ProcessedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum GlobalCurriculumItems {
    #[sea_orm(iden = "global_curriculum_items")]
    Table,
    Id,
    Level,
    Name,
    Code,
    Description,
    Content,
    ContentType,
    VideoUrl,
    ImageUrl,
    InstitutionType,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CurriculumNodes {
    #[sea_orm(iden = "curriculum_nodes")]
    Table,
    Id,
    InstitutionId,
    Level,
    ParentId,
    TrackId,
    SectionId,
    GlobalItemId,
    Name,
    SortOrder,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Sections {
    #[sea_orm(iden = "sections")]
    Table,
    Id,
    InstitutionId,
    TrackId,
    Name,
    SortOrder,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum TeacherEnrollments {
    #[sea_orm(iden = "teacher_enrollments")]
    Table,
    Id,
    InstitutionId,
    UserId,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum TeacherEnrollmentLinks {
    #[sea_orm(iden = "teacher_enrollment_links")]
    Table,
    Id,
    EnrollmentId,
    TargetKind,
    TargetId,
}

#[derive(DeriveIden)]
enum StudentEnrollments {
    #[sea_orm(iden = "student_enrollments")]
    Table,
    Id,
    InstitutionId,
    UserId,
    TrackId,
    SectionId,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum FeeSettings {
    #[sea_orm(iden = "fee_settings")]
    Table,
    Id,
    InstitutionId,
    Scope,
    TargetId,
    AmountMinor,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Attendances {
    #[sea_orm(iden = "attendances")]
    Table,
    Id,
    InstitutionId,
    StudentId,
    SectionId,
    SubjectId,
    Date,
    Status,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum QuizQuestions {
    #[sea_orm(iden = "quiz_questions")]
    Table,
    Id,
    TrackId,
    StreamId,
    SubjectId,
    ModuleId,
    UnitId,
    LessonId,
    MicroLessonId,
    QuestionType,
    Text,
    ImageUrl,
    Marks,
    Status,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum QuizOptions {
    #[sea_orm(iden = "quiz_options")]
    Table,
    Id,
    QuestionId,
    Label,
    Text,
    IsCorrect,
}

#[derive(DeriveIden)]
enum Quizzes {
    #[sea_orm(iden = "quizzes")]
    Table,
    Id,
    InstitutionId,
    TrackId,
    SectionId,
    StreamId,
    SubjectId,
    ModuleId,
    UnitId,
    LessonId,
    MicroLessonId,
    Title,
    StartTime,
    EndTime,
    TimerPerQuestion,
    EnableNegativeMarking,
    NegativeMarks,
    Status,
    IsFree,
    IsActive,
    SortOrder,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum QuizItems {
    #[sea_orm(iden = "quiz_items")]
    Table,
    Id,
    QuizId,
    QuestionId,
    SortOrder,
}

#[derive(DeriveIden)]
enum QuizAttempts {
    #[sea_orm(iden = "quiz_attempts")]
    Table,
    Id,
    QuizId,
    StudentId,
    InstitutionId,
    Status,
    Score,
    StartedAt,
    CompletedAt,
}

#[derive(DeriveIden)]
enum QuizResponses {
    #[sea_orm(iden = "quiz_responses")]
    Table,
    Id,
    AttemptId,
    QuestionId,
    SelectedOption,
    ShortAnswer,
    IsCorrect,
    ManualScore,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Homeworks {
    #[sea_orm(iden = "homeworks")]
    Table,
    Id,
    InstitutionId,
    TrackId,
    SectionId,
    SubjectId,
    Title,
    Description,
    DueDate,
    CreatedBy,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum HomeworkSubmissions {
    #[sea_orm(iden = "homework_submissions")]
    Table,
    Id,
    HomeworkId,
    StudentId,
    Submitted,
    SubmissionDate,
    UpdatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Exams {
    #[sea_orm(iden = "exams")]
    Table,
    Id,
    InstitutionId,
    TrackId,
    SectionId,
    SubjectId,
    Title,
    ExamType,
    ExamDate,
    TotalMarks,
    IsActive,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ExamMarks {
    #[sea_orm(iden = "exam_marks")]
    Table,
    Id,
    ExamId,
    StudentId,
    MarksObtained,
    Remarks,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Syllabi {
    #[sea_orm(iden = "syllabi")]
    Table,
    Id,
    InstitutionId,
    TrackId,
    SectionId,
    SubjectId,
    Title,
    Purpose,
    CreatedBy,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum SyllabusItems {
    #[sea_orm(iden = "syllabus_items")]
    Table,
    Id,
    SyllabusId,
    NodeId,
}

#[derive(DeriveIden)]
enum Notices {
    #[sea_orm(iden = "notices")]
    Table,
    Id,
    InstitutionId,
    Title,
    Content,
    TargetAudience,
    NoticeType,
    CreatedBy,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Scholarships {
    #[sea_orm(iden = "scholarships")]
    Table,
    Id,
    InstitutionId,
    StudentEnrollmentId,
    PercentageHundredths,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum BkashPayments {
    #[sea_orm(iden = "bkash_payments")]
    Table,
    Id,
    PaymentId,
    InvoiceNumber,
    AmountMinor,
    Status,
    TrxId,
    PayerId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum StudentFeePayments {
    #[sea_orm(iden = "student_fee_payments")]
    Table,
    Id,
    EnrollmentId,
    InstitutionId,
    BkashPaymentId,
    AmountMinor,
    Month,
    Status,
    ScholarshipApplied,
    ScholarshipMinor,
    PaidBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum InstitutionPaymentTrackers {
    #[sea_orm(iden = "institution_payment_trackers")]
    Table,
    Id,
    InstitutionId,
    FeePaymentId,
    AmountMinor,
    IsDisbursed,
    DisbursedAt,
    CreatedAt,
}
