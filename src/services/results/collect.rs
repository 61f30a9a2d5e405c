//! 汇总学生的测验与考试成绩

use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::Result;
use crate::models::{
    exams::entities::{Exam, ExamMark},
    quiz::{
        entities::{Quiz, QuizAttempt},
        requests::AttemptFilter,
    },
    results::responses::{ExamResult, QuizResult, StudentResultsResponse},
};
use crate::storage::Storage;

/// 成绩筛选范围
#[derive(Debug, Clone, Default)]
pub struct ResultScope<'a> {
    pub section_id: Option<&'a str>,
    pub subject_id: Option<&'a str>,
}

impl ResultScope<'_> {
    fn keeps_quiz(&self, quiz: &Quiz) -> bool {
        self.subject_id.is_none_or(|s| s == quiz.subject_id)
            && self
                .section_id
                .is_none_or(|s| quiz.section_id.as_deref().is_none_or(|qs| qs == s))
    }

    fn keeps_exam(&self, exam: &Exam) -> bool {
        self.subject_id.is_none_or(|s| s == exam.subject_id)
            && self.section_id.is_none_or(|s| s == exam.section_id)
    }
}

/// 按学生组装成绩，缺失测验或考试的记录跳过
pub fn assemble(
    student_id: &str,
    student_name: String,
    attempts: &[QuizAttempt],
    quizzes: &HashMap<String, Quiz>,
    marks: &[ExamMark],
    exams: &HashMap<String, Exam>,
    scope: &ResultScope<'_>,
) -> StudentResultsResponse {
    let quiz_results = attempts
        .iter()
        .filter(|a| a.student_id == student_id)
        .filter_map(|a| {
            let quiz = quizzes.get(&a.quiz_id).filter(|q| scope.keeps_quiz(q))?;
            Some(QuizResult {
                attempt_id: a.id.clone(),
                quiz_id: quiz.id.clone(),
                quiz_title: quiz.title.clone(),
                subject_id: quiz.subject_id.clone(),
                score: a.score,
                completed_at: a.completed_at,
            })
        })
        .collect();

    let exam_results = marks
        .iter()
        .filter(|m| m.student_id == student_id)
        .filter_map(|m| {
            let exam = exams.get(&m.exam_id).filter(|e| scope.keeps_exam(e))?;
            Some(ExamResult {
                exam_id: exam.id.clone(),
                title: exam.title.clone(),
                exam_type: exam.exam_type,
                subject_id: exam.subject_id.clone(),
                exam_date: exam.exam_date.clone(),
                total_marks: exam.total_marks,
                marks_obtained: m.marks_obtained,
                remarks: m.remarks.clone(),
            })
        })
        .collect();

    StudentResultsResponse {
        student_id: student_id.to_string(),
        student_name,
        quiz_results,
        exam_results,
    }
}

/// 读取一批学生在机构内的成绩
pub async fn load_results(
    storage: &Arc<dyn Storage>,
    institution_id: &str,
    students: Vec<(String, String)>,
    scope: &ResultScope<'_>,
) -> Result<Vec<StudentResultsResponse>> {
    let student_ids: Vec<String> = students.iter().map(|(id, _)| id.clone()).collect();
    if student_ids.is_empty() {
        return Ok(vec![]);
    }

    let attempts = storage
        .list_all_attempts(AttemptFilter {
            student_ids: Some(student_ids.clone()),
            institution_id: Some(institution_id.to_string()),
            only_completed: true,
            ..Default::default()
        })
        .await?;
    let mut quiz_ids: Vec<String> = attempts.iter().map(|a| a.quiz_id.clone()).collect();
    quiz_ids.sort();
    quiz_ids.dedup();
    let quizzes: HashMap<String, Quiz> = storage
        .get_quizzes_by_ids(&quiz_ids)
        .await?
        .into_iter()
        .map(|q| (q.id.clone(), q))
        .collect();

    let marks = storage.list_exam_marks(None, Some(student_ids)).await?;
    let mut exam_ids: Vec<String> = marks.iter().map(|m| m.exam_id.clone()).collect();
    exam_ids.sort();
    exam_ids.dedup();
    let exams: HashMap<String, Exam> = storage
        .get_exams_by_ids(&exam_ids)
        .await?
        .into_iter()
        .filter(|e| e.institution_id == institution_id)
        .map(|e| (e.id.clone(), e))
        .collect();

    Ok(students
        .into_iter()
        .map(|(id, name)| assemble(&id, name, &attempts, &quizzes, &marks, &exams, scope))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{exams::entities::ExamType, quiz::entities::AttemptStatus};

    fn exam(id: &str, section: &str, subject: &str) -> Exam {
        Exam {
            id: id.to_string(),
            institution_id: "inst".to_string(),
            track_id: "track".to_string(),
            section_id: section.to_string(),
            subject_id: subject.to_string(),
            title: format!("Exam {id}"),
            exam_type: ExamType::Midterm,
            exam_date: "2025-02-01".to_string(),
            total_marks: 100.0,
            is_active: true,
            created_by: "teacher".to_string(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn mark(exam_id: &str, student: &str, marks: f64) -> ExamMark {
        ExamMark {
            id: format!("{exam_id}-{student}"),
            exam_id: exam_id.to_string(),
            student_id: student.to_string(),
            marks_obtained: marks,
            remarks: None,
            created_by: "teacher".to_string(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn attempt(id: &str, quiz_id: &str, student: &str, score: f64) -> QuizAttempt {
        QuizAttempt {
            id: id.to_string(),
            quiz_id: quiz_id.to_string(),
            student_id: student.to_string(),
            institution_id: "inst".to_string(),
            status: AttemptStatus::Completed,
            score,
            started_at: chrono::Utc::now(),
            completed_at: Some(chrono::Utc::now()),
        }
    }

    #[test]
    fn test_assemble_filters_by_student_and_scope() {
        let exams: HashMap<String, Exam> = [
            exam("e1", "sec-a", "math"),
            exam("e2", "sec-a", "physics"),
            exam("e3", "sec-b", "math"),
        ]
        .into_iter()
        .map(|e| (e.id.clone(), e))
        .collect();
        let marks = vec![
            mark("e1", "s1", 80.0),
            mark("e2", "s1", 70.0),
            mark("e3", "s1", 60.0),
            mark("e1", "s2", 90.0),
            mark("missing", "s1", 10.0),
        ];
        let attempts = vec![attempt("a1", "unknown-quiz", "s1", 3.0)];

        let scope = ResultScope {
            section_id: Some("sec-a"),
            subject_id: Some("math"),
        };
        let result = assemble(
            "s1",
            "Student One".to_string(),
            &attempts,
            &HashMap::new(),
            &marks,
            &exams,
            &scope,
        );
        assert_eq!(result.exam_results.len(), 1);
        assert_eq!(result.exam_results[0].marks_obtained, 80.0);
        assert!(result.quiz_results.is_empty());

        let all = assemble(
            "s1",
            "Student One".to_string(),
            &attempts,
            &HashMap::new(),
            &marks,
            &exams,
            &ResultScope::default(),
        );
        assert_eq!(all.exam_results.len(), 3);
    }
}
