use armada_domain::status::ApprovalStatus;
use armada_fleet::domain::types::{EvidencePatch, ReportEvidence, WorkflowPolicy};
use armada_fleet::error::FleetServiceError;
use armada_fleet::usecase::report::{
    CreateReportInput, CreateReportUseCase, ReportHistoryUseCase, TransitionReportInput,
    TransitionReportUseCase, UpdateReportEvidenceInput, UpdateReportEvidenceUseCase,
};
use armada_fleet::usecase::submission::{CreateSubmissionInput, CreateSubmissionUseCase};

use crate::helpers::{
    MockReportRepo, MockSubmissionRepo, MockUserRepo, MockVehicleRepo, test_user, test_vehicle,
};

const PIC: i32 = 7;
const RECEIVER: i32 = 9;
const SUPERVISOR: i32 = 9;

fn staff() -> MockUserRepo {
    MockUserRepo::new(vec![
        test_user(PIC, "pic@agency.go.id", 0),
        test_user(RECEIVER, "supervisor@agency.go.id", 1),
    ])
}

/// Seed a Submission in `status`, returning the repo holding it.
async fn seeded_submission(status: ApprovalStatus, unique_code: &str) -> MockSubmissionRepo {
    let repo = MockSubmissionRepo::empty();
    CreateSubmissionUseCase {
        users: staff(),
        submissions: MockSubmissionRepo {
            submissions: repo.submissions_handle(),
            logs: repo.logs_handle(),
        },
    }
    .execute(CreateSubmissionInput {
        unique_code: unique_code.to_owned(),
        creator_id: PIC,
        receiver_id: RECEIVER,
        amount_rupiah: 100_000,
        description: None,
        agency_id: 1,
    })
    .await
    .unwrap();
    repo.submissions_handle().lock().unwrap()[0].status = status;
    if status != ApprovalStatus::Pending {
        // Keep the trail consistent with the steered status.
        let logs_handle = repo.logs_handle();
        let mut logs = logs_handle.lock().unwrap();
        let id = logs.iter().map(|l| l.id).max().unwrap_or(0) + 1;
        let mut row = logs[0].clone();
        row.id = id;
        row.status = status;
        row.actor_id = RECEIVER;
        logs.push(row);
    }
    repo
}

fn create_input(unique_code: &str) -> CreateReportInput {
    CreateReportInput {
        unique_code: unique_code.to_owned(),
        user_id: PIC,
        vehicle_id: 1,
        amount_rupiah: 95_000,
        amount_liter: 12.5,
        gps_lat: Some(-6.2),
        gps_lng: Some(106.8),
        odometer_km: Some(45_120),
        evidence: ReportEvidence::default(),
        agency_id: 1,
    }
}

#[tokio::test]
async fn should_create_pending_report_against_accepted_submission() {
    let uc = CreateReportUseCase {
        users: staff(),
        vehicles: MockVehicleRepo::new(vec![test_vehicle(1, 1)]),
        submissions: seeded_submission(ApprovalStatus::Accepted, "SUB-202608-1").await,
        reports: MockReportRepo::empty(),
    };
    let logs = uc.reports.logs_handle();

    let report = uc.execute(create_input("SUB-202608-1")).await.unwrap();

    assert_eq!(report.status, ApprovalStatus::Pending);
    assert_eq!(report.unique_code, "SUB-202608-1");
    let logs = logs.lock().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].status, ApprovalStatus::Pending);
}

#[tokio::test]
async fn should_reject_report_against_pending_submission() {
    let uc = CreateReportUseCase {
        users: staff(),
        vehicles: MockVehicleRepo::new(vec![test_vehicle(1, 1)]),
        submissions: seeded_submission(ApprovalStatus::Pending, "SUB-202608-1").await,
        reports: MockReportRepo::empty(),
    };

    let result = uc.execute(create_input("SUB-202608-1")).await;
    assert!(matches!(result, Err(FleetServiceError::InvalidReference)));
    assert!(uc.reports.reports_handle().lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_reject_report_with_unknown_vehicle() {
    let uc = CreateReportUseCase {
        users: staff(),
        vehicles: MockVehicleRepo::empty(),
        submissions: seeded_submission(ApprovalStatus::Accepted, "SUB-202608-1").await,
        reports: MockReportRepo::empty(),
    };

    let result = uc.execute(create_input("SUB-202608-1")).await;
    assert!(matches!(result, Err(FleetServiceError::InvalidReference)));
}

#[tokio::test]
async fn should_reject_report_filed_by_someone_else() {
    let uc = CreateReportUseCase {
        users: staff(),
        vehicles: MockVehicleRepo::new(vec![test_vehicle(1, 1)]),
        submissions: seeded_submission(ApprovalStatus::Accepted, "SUB-202608-1").await,
        reports: MockReportRepo::empty(),
    };

    let mut input = create_input("SUB-202608-1");
    input.user_id = RECEIVER;
    let result = uc.execute(input).await;
    assert!(matches!(result, Err(FleetServiceError::Forbidden)));
}

#[tokio::test]
async fn should_reject_second_report_for_same_unique_code() {
    let uc = CreateReportUseCase {
        users: staff(),
        vehicles: MockVehicleRepo::new(vec![test_vehicle(1, 1)]),
        submissions: seeded_submission(ApprovalStatus::Accepted, "SUB-202608-1").await,
        reports: MockReportRepo::empty(),
    };

    uc.execute(create_input("SUB-202608-1")).await.unwrap();
    let result = uc.execute(create_input("SUB-202608-1")).await;
    assert!(matches!(result, Err(FleetServiceError::DuplicateCode)));
}

async fn seeded_report(reports: &MockReportRepo) -> i32 {
    let uc = CreateReportUseCase {
        users: staff(),
        vehicles: MockVehicleRepo::new(vec![test_vehicle(1, 1)]),
        submissions: seeded_submission(ApprovalStatus::Accepted, "SUB-202608-1").await,
        reports: MockReportRepo {
            reports: reports.reports_handle(),
            logs: reports.logs_handle(),
        },
    };
    uc.execute(create_input("SUB-202608-1")).await.unwrap().id
}

#[tokio::test]
async fn should_let_supervisor_accept_report_with_log_row() {
    let reports = MockReportRepo::empty();
    let report_id = seeded_report(&reports).await;

    let uc = TransitionReportUseCase {
        reports,
        policy: WorkflowPolicy::default(),
    };
    let report = uc
        .execute(TransitionReportInput {
            report_id,
            status: ApprovalStatus::Accepted,
            actor_id: SUPERVISOR,
            actor_role: 1,
            notes: Some("receipts match".to_owned()),
        })
        .await
        .unwrap();

    assert_eq!(report.status, ApprovalStatus::Accepted);
    let logs = uc.reports.logs_handle();
    let logs = logs.lock().unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[1].status, ApprovalStatus::Accepted);
    assert_eq!(logs[1].notes.as_deref(), Some("receipts match"));
}

#[tokio::test]
async fn should_forbid_report_transition_by_pic() {
    let reports = MockReportRepo::empty();
    let report_id = seeded_report(&reports).await;

    let uc = TransitionReportUseCase {
        reports,
        policy: WorkflowPolicy::default(),
    };
    let result = uc
        .execute(TransitionReportInput {
            report_id,
            status: ApprovalStatus::Accepted,
            actor_id: PIC,
            actor_role: 0,
            notes: None,
        })
        .await;
    assert!(matches!(result, Err(FleetServiceError::Forbidden)));
}

#[tokio::test]
async fn should_patch_evidence_without_touching_the_log() {
    let reports = MockReportRepo::empty();
    let report_id = seeded_report(&reports).await;

    let uc = UpdateReportEvidenceUseCase {
        reports,
        policy: WorkflowPolicy::default(),
    };
    let report = uc
        .execute(UpdateReportEvidenceInput {
            report_id,
            actor_id: PIC,
            actor_role: 0,
            patch: EvidencePatch {
                invoice_photo: Some("uploads/invoice-123.jpg".to_owned()),
                odometer_km: Some(45_180),
                ..Default::default()
            },
        })
        .await
        .unwrap();

    assert_eq!(
        report.evidence.invoice_photo.as_deref(),
        Some("uploads/invoice-123.jpg")
    );
    assert_eq!(report.odometer_km, Some(45_180));
    let logs = uc.reports.logs_handle();
    assert_eq!(
        logs.lock().unwrap().len(),
        1,
        "evidence patches are not audited; only the creation row exists"
    );
}

#[tokio::test]
async fn should_reject_empty_evidence_patch() {
    let reports = MockReportRepo::empty();
    let report_id = seeded_report(&reports).await;

    let uc = UpdateReportEvidenceUseCase {
        reports,
        policy: WorkflowPolicy::default(),
    };
    let result = uc
        .execute(UpdateReportEvidenceInput {
            report_id,
            actor_id: PIC,
            actor_role: 0,
            patch: EvidencePatch::default(),
        })
        .await;
    assert!(matches!(result, Err(FleetServiceError::MissingData)));
}

#[tokio::test]
async fn should_report_integrity_fault_when_report_log_diverges() {
    let reports = MockReportRepo::empty();
    let report_id = seeded_report(&reports).await;

    reports.reports_handle().lock().unwrap()[0].status = ApprovalStatus::Rejected;

    let uc = ReportHistoryUseCase { reports };
    let result = uc.execute(report_id).await;
    assert!(matches!(result, Err(FleetServiceError::Integrity(_))));
}
