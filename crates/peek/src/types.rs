use peek_core::TaskStatus;
use serde::{Deserialize, Serialize};

/// Body of a task-creation request. `json_str` carries the uploaded strategy
/// file verbatim; the backend performs its own validation of the contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub token: String,
    pub course_id: String,
    pub json_str: String,
}

impl SubmitRequest {
    pub fn new(
        token: impl Into<String>,
        course_id: impl Into<String>,
        strategy_json: impl Into<String>,
    ) -> Self {
        Self {
            token: token.into(),
            course_id: course_id.into(),
            json_str: strategy_json.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TaskCreatedResponse {
    pub task_id: String,
}

/// Raw status document as the backend serves it.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskStatusResponse {
    pub status: String,
    pub progress: Option<f64>,
    pub result: Option<String>,
}

/// One decoded status observation. `result` is present only on done and is
/// itself serialized JSON requiring a second decode by the normalizer.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSnapshot {
    pub status: TaskStatus,
    pub progress: Option<f64>,
    pub result: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CourseInfoRequest {
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CourseListResponse {
    pub courses: Vec<Course>,
}

/// One course-catalog record. The backend serves Chinese keys; apart from
/// `course_id` (used for submission) the fields are opaque cargo for the UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    #[serde(rename = "序号")]
    pub serial: String,
    #[serde(rename = "课程")]
    pub course: String,
    #[serde(rename = "学分")]
    pub credits: String,
    #[serde(rename = "总学时")]
    pub total_hours: String,
    #[serde(rename = "类别")]
    pub category: String,
    #[serde(rename = "开课校区")]
    pub campus: String,
    #[serde(rename = "选课号")]
    pub course_id: String,
    #[serde(rename = "任课教师")]
    pub teacher: String,
    #[serde(rename = "投入选课币")]
    pub committed_coins: String,
    #[serde(rename = "购买教材")]
    pub textbook: String,
    #[serde(rename = "重修")]
    pub retake: String,
    #[serde(rename = "上课班调剂")]
    pub class_adjustment: String,
    #[serde(rename = "选课方式")]
    pub selection_mode: String,
    #[serde(rename = "选课状态")]
    pub selection_status: String,
    #[serde(rename = "备注", default)]
    pub remark: String,
}

/// One record of a terminal result payload. The amount stays a string here;
/// decimal parsing and ranking are the normalizer's concern.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawBidRecord {
    #[serde(rename = "姓名", alias = "name")]
    pub name: String,
    #[serde(rename = "学号", alias = "id")]
    pub student_id: String,
    #[serde(rename = "投入选课币", alias = "amount")]
    pub amount: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_request_wire_shape() {
        let request = SubmitRequest::new("tok-1", "20245678", "{\"budget\":100}");

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["token"], "tok-1");
        assert_eq!(json["course_id"], "20245678");
        assert_eq!(json["json_str"], "{\"budget\":100}");
    }

    #[test]
    fn test_bid_record_chinese_keys() {
        let record: RawBidRecord =
            serde_json::from_str(r#"{"姓名":"张三","学号":"2021302180001","投入选课币":"150"}"#)
                .unwrap();

        assert_eq!(record.name, "张三");
        assert_eq!(record.student_id, "2021302180001");
        assert_eq!(record.amount, "150");
    }

    #[test]
    fn test_bid_record_english_aliases() {
        let record: RawBidRecord =
            serde_json::from_str(r#"{"name":"A","id":"1","amount":"99.5"}"#).unwrap();

        assert_eq!(record.name, "A");
        assert_eq!(record.amount, "99.5");
    }

    #[test]
    fn test_course_deserialization() {
        let course: Course = serde_json::from_str(
            r#"{
                "序号": "1",
                "课程": "[H0000123]高等数学",
                "学分": "4",
                "总学时": "72",
                "类别": "必修",
                "开课校区": "主校区",
                "选课号": "20245678",
                "任课教师": "[0001]李老师",
                "投入选课币": "10",
                "购买教材": "是",
                "重修": "否",
                "上课班调剂": "否",
                "选课方式": "投币",
                "选课状态": "选中"
            }"#,
        )
        .unwrap();

        assert_eq!(course.course_id, "20245678");
        assert_eq!(course.selection_status, "选中");
        assert_eq!(course.remark, "");
    }
}
