use uuid::Uuid;

use uservault_badges::domain::types::{AdminEdits, DEFAULT_DENIAL_REASON, RequestStatus};
use uservault_badges::error::BadgesServiceError;
use uservault_badges::usecase::review::{
    ApproveRequestInput, ApproveRequestUseCase, DenyRequestInput, DenyRequestUseCase,
};

use crate::helpers::{
    FailingMailer, MockDirectory, MockMailer, MockRequestRepo, test_directory_user, test_request,
};

// ── Approve ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_mint_badge_and_email_owner_on_approval() {
    let user_id = Uuid::new_v4();
    let request = test_request(user_id, RequestStatus::Pending);
    let requests = MockRequestRepo::new(vec![request.clone()]);
    let mailer = MockMailer::new();

    let uc = ApproveRequestUseCase {
        requests: requests.clone(),
        directory: MockDirectory::new(vec![test_directory_user(user_id)]),
        mailer: mailer.clone(),
    };

    let out = uc
        .execute(ApproveRequestInput {
            request_id: request.id,
            edits: AdminEdits::default(),
        })
        .await
        .unwrap();

    let badges = requests.badges.lock().unwrap();
    assert_eq!(badges.len(), 1);
    assert_eq!(badges[0].id, out.badge_id);
    assert_eq!(badges[0].name, request.badge_name);
    assert_eq!(badges[0].color, request.badge_color);
    assert_eq!(badges[0].rarity, "common");
    assert!(badges[0].is_limited);
    assert_eq!(badges[0].max_claims, 1);
    assert_eq!(badges[0].claims_count, 0);

    let stored = requests.requests.lock().unwrap();
    assert_eq!(stored[0].status, RequestStatus::Approved);
    assert!(stored[0].reviewed_at.is_some());

    let sent = mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "user@example.com");
    assert!(sent[0].subject.contains("approved"));
}

#[tokio::test]
async fn should_apply_moderator_edits_to_minted_badge() {
    let user_id = Uuid::new_v4();
    let request = test_request(user_id, RequestStatus::Pending);
    let requests = MockRequestRepo::new(vec![request.clone()]);

    let uc = ApproveRequestUseCase {
        requests: requests.clone(),
        directory: MockDirectory::new(vec![test_directory_user(user_id)]),
        mailer: MockMailer::new(),
    };

    uc.execute(ApproveRequestInput {
        request_id: request.id,
        edits: AdminEdits {
            name: Some("Founding Member".to_owned()),
            color: Some("#f59e0b".to_owned()),
            ..AdminEdits::default()
        },
    })
    .await
    .unwrap();

    let badges = requests.badges.lock().unwrap();
    assert_eq!(badges[0].name, "Founding Member");
    assert_eq!(badges[0].color, "#f59e0b");
    // Unedited fields keep the requested values.
    assert_eq!(badges[0].description, request.badge_description);

    let stored = requests.requests.lock().unwrap();
    assert_eq!(stored[0].admin_edited_name.as_deref(), Some("Founding Member"));
    assert!(stored[0].admin_edited_description.is_none());
}

#[tokio::test]
async fn should_mint_exactly_one_badge_across_repeated_approvals() {
    let user_id = Uuid::new_v4();
    let request = test_request(user_id, RequestStatus::Pending);
    let requests = MockRequestRepo::new(vec![request.clone()]);

    let uc = ApproveRequestUseCase {
        requests: requests.clone(),
        directory: MockDirectory::new(vec![test_directory_user(user_id)]),
        mailer: MockMailer::new(),
    };

    uc.execute(ApproveRequestInput {
        request_id: request.id,
        edits: AdminEdits::default(),
    })
    .await
    .unwrap();

    let second = uc
        .execute(ApproveRequestInput {
            request_id: request.id,
            edits: AdminEdits::default(),
        })
        .await;

    assert!(matches!(second, Err(BadgesServiceError::AlreadyReviewed)));
    assert_eq!(requests.badges.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_approve_even_when_email_delivery_fails() {
    let user_id = Uuid::new_v4();
    let request = test_request(user_id, RequestStatus::Pending);
    let requests = MockRequestRepo::new(vec![request.clone()]);

    let uc = ApproveRequestUseCase {
        requests: requests.clone(),
        directory: MockDirectory::new(vec![test_directory_user(user_id)]),
        mailer: FailingMailer,
    };

    uc.execute(ApproveRequestInput {
        request_id: request.id,
        edits: AdminEdits::default(),
    })
    .await
    .unwrap();

    assert_eq!(requests.requests.lock().unwrap()[0].status, RequestStatus::Approved);
}

#[tokio::test]
async fn should_return_not_found_for_unknown_request() {
    let uc = ApproveRequestUseCase {
        requests: MockRequestRepo::empty(),
        directory: MockDirectory::empty(),
        mailer: MockMailer::new(),
    };

    let result = uc
        .execute(ApproveRequestInput {
            request_id: Uuid::new_v4(),
            edits: AdminEdits::default(),
        })
        .await;
    assert!(matches!(result, Err(BadgesServiceError::RequestNotFound)));
}

// ── Deny ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_deny_with_given_reason_and_email_owner() {
    let user_id = Uuid::new_v4();
    let request = test_request(user_id, RequestStatus::Pending);
    let requests = MockRequestRepo::new(vec![request.clone()]);
    let mailer = MockMailer::new();

    let uc = DenyRequestUseCase {
        requests: requests.clone(),
        directory: MockDirectory::new(vec![test_directory_user(user_id)]),
        mailer: mailer.clone(),
    };

    uc.execute(DenyRequestInput {
        request_id: request.id,
        denial_reason: Some("Name too close to a staff badge".to_owned()),
    })
    .await
    .unwrap();

    let stored = requests.requests.lock().unwrap();
    assert_eq!(stored[0].status, RequestStatus::Denied);
    assert_eq!(
        stored[0].denial_reason.as_deref(),
        Some("Name too close to a staff badge")
    );
    assert!(stored[0].reviewed_at.is_some());

    let sent = mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].html.contains("Name too close to a staff badge"));
}

#[tokio::test]
async fn should_fall_back_to_default_denial_reason() {
    let user_id = Uuid::new_v4();
    let request = test_request(user_id, RequestStatus::Pending);
    let requests = MockRequestRepo::new(vec![request.clone()]);

    let uc = DenyRequestUseCase {
        requests: requests.clone(),
        directory: MockDirectory::new(vec![test_directory_user(user_id)]),
        mailer: MockMailer::new(),
    };

    // Absent and blank reasons both fall back.
    uc.execute(DenyRequestInput {
        request_id: request.id,
        denial_reason: Some("   ".to_owned()),
    })
    .await
    .unwrap();

    assert_eq!(
        requests.requests.lock().unwrap()[0].denial_reason.as_deref(),
        Some(DEFAULT_DENIAL_REASON)
    );
}

#[tokio::test]
async fn should_not_deny_an_already_reviewed_request() {
    let user_id = Uuid::new_v4();
    let request = test_request(user_id, RequestStatus::Approved);

    let uc = DenyRequestUseCase {
        requests: MockRequestRepo::new(vec![request.clone()]),
        directory: MockDirectory::new(vec![test_directory_user(user_id)]),
        mailer: MockMailer::new(),
    };

    let result = uc
        .execute(DenyRequestInput {
            request_id: request.id,
            denial_reason: None,
        })
        .await;
    assert!(matches!(result, Err(BadgesServiceError::AlreadyReviewed)));
}
