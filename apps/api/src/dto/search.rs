use serde::{Deserialize, Serialize};
use ts_rs::TS;

use pratibha_application::{
    InstituteSearchGroup, IssuerSessionView, PersonSearchResult, PublicActivityEntry,
    StudentSearchEntry,
};

/// What an issuer sees when opening their verification link.
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct IssuerSessionResponse {
    pub activity_title: String,
    pub activity_type: String,
    pub student_name: String,
    pub issuer_email: String,
    pub expires_at: String,
}

impl From<IssuerSessionView> for IssuerSessionResponse {
    fn from(view: IssuerSessionView) -> Self {
        Self {
            activity_title: view.activity_title,
            activity_type: view.activity_type.as_str().to_owned(),
            student_name: view.student_name,
            issuer_email: view.issuer_email,
            expires_at: view.expires_at.to_rfc3339(),
        }
    }
}

/// Incoming payload for an issuer credential confirmation.
#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct IssuerVerifyRequest {
    pub token: String,
    pub credential_id: String,
}

/// One activity on the public search surface, with its relabeled status.
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct PublicActivityResponse {
    pub title: String,
    pub activity_type: String,
    pub status: String,
    pub issuer_verified: bool,
}

impl From<PublicActivityEntry> for PublicActivityResponse {
    fn from(entry: PublicActivityEntry) -> Self {
        Self {
            title: entry.title,
            activity_type: entry.activity_type.as_str().to_owned(),
            status: entry.status_label,
            issuer_verified: entry.issuer_verified,
        }
    }
}

/// One matched student on the public search surface.
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct SearchStudentResponse {
    pub display_name: String,
    pub roll_number: String,
    pub attendance_percentage: Option<f64>,
    pub cgpa: Option<f64>,
    pub activities: Vec<PublicActivityResponse>,
}

impl From<StudentSearchEntry> for SearchStudentResponse {
    fn from(entry: StudentSearchEntry) -> Self {
        Self {
            display_name: entry.display_name,
            roll_number: entry.roll_number,
            attendance_percentage: entry.attendance_percentage,
            cgpa: entry.cgpa,
            activities: entry
                .activities
                .into_iter()
                .map(PublicActivityResponse::from)
                .collect(),
        }
    }
}

/// Matched students of one institute.
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct SearchInstituteResponse {
    pub institute_id: String,
    pub institute_name: String,
    pub students: Vec<SearchStudentResponse>,
}

impl From<InstituteSearchGroup> for SearchInstituteResponse {
    fn from(group: InstituteSearchGroup) -> Self {
        Self {
            institute_id: group.institute_id.to_string(),
            institute_name: group.institute_name,
            students: group
                .students
                .into_iter()
                .map(SearchStudentResponse::from)
                .collect(),
        }
    }
}

/// Complete response of an Aadhar search.
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct SearchResponse {
    pub institutes: Vec<SearchInstituteResponse>,
}

impl From<PersonSearchResult> for SearchResponse {
    fn from(result: PersonSearchResult) -> Self {
        Self {
            institutes: result
                .institutes
                .into_iter()
                .map(SearchInstituteResponse::from)
                .collect(),
        }
    }
}
