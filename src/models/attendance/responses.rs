use serde::Serialize;
use ts_rs::TS;

use super::entities::{Attendance, AttendanceStatus};

// 单个学生的出勤统计
#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct AttendanceStatistics {
    pub student_id: String,
    pub student_name: String,
    pub present: i64,
    pub absent: i64,
    pub late: i64,
    pub excused: i64,
    pub total: i64,
}

impl AttendanceStatistics {
    pub fn record(&mut self, status: AttendanceStatus) {
        match status {
            AttendanceStatus::Present => self.present += 1,
            AttendanceStatus::Absent => self.absent += 1,
            AttendanceStatus::Late => self.late += 1,
            AttendanceStatus::Excused => self.excused += 1,
        }
        self.total += 1;
    }
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct BulkAttendanceResponse {
    pub created: usize,
    pub items: Vec<Attendance>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statistics_counts() {
        let mut stats = AttendanceStatistics::default();
        for status in [
            AttendanceStatus::Present,
            AttendanceStatus::Present,
            AttendanceStatus::Late,
            AttendanceStatus::Absent,
        ] {
            stats.record(status);
        }
        assert_eq!(stats.present, 2);
        assert_eq!(stats.late, 1);
        assert_eq!(stats.absent, 1);
        assert_eq!(stats.excused, 0);
        assert_eq!(stats.total, 4);
    }
}
