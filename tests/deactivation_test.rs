mod common;

use anyhow::Result;
use common::{LAYOUTS, create_user, deposit};
use tinyledger::application::{
    AppError, BalanceRequest, CreateAccountRequest, DeactivateUserRequest, DepositRequest,
    ErrorKind, HistoryRequest, LedgerService, TransferRequest, WithdrawRequest,
};
use tinyledger::domain::{LedgerLayout, new_id};
use tinyledger::storage::StoreError;

async fn deactivate(service: &LedgerService, user_id: &str) -> Result<(), AppError> {
    service
        .deactivate_user(DeactivateUserRequest {
            user_id: user_id.to_string(),
        })
        .await
}

#[tokio::test]
async fn test_deactivated_user_loses_access() -> Result<()> {
    for layout in LAYOUTS {
        let service = LedgerService::in_memory(layout);
        let joe = create_user(&service, "joe").await?;
        let mary = create_user(&service, "mary").await?;
        deposit(&service, &joe, 20).await?;
        deposit(&service, &mary, 20).await?;

        deactivate(&service, &joe.user_id).await?;

        let errors = vec![
            service
                .balance(BalanceRequest {
                    user_id: joe.user_id.clone(),
                    account_id: joe.account_id.clone(),
                })
                .await
                .unwrap_err(),
            service
                .deposit(DepositRequest {
                    user_id: joe.user_id.clone(),
                    account_id: joe.account_id.clone(),
                    amount: 1,
                })
                .await
                .unwrap_err(),
            service
                .withdraw(WithdrawRequest {
                    user_id: joe.user_id.clone(),
                    account_id: joe.account_id.clone(),
                    amount: 1,
                })
                .await
                .unwrap_err(),
            service
                .history(HistoryRequest {
                    user_id: joe.user_id.clone(),
                    account_id: joe.account_id.clone(),
                })
                .await
                .unwrap_err(),
            service
                .create_account(CreateAccountRequest {
                    user_id: joe.user_id.clone(),
                })
                .await
                .unwrap_err(),
            // joe as sender
            service
                .transfer(TransferRequest {
                    sender_user_id: joe.user_id.clone(),
                    receiver_user_id: mary.user_id.clone(),
                    sender_account_id: joe.account_id.clone(),
                    receiver_account_id: mary.account_id.clone(),
                    amount: 1,
                })
                .await
                .unwrap_err(),
            // joe as receiver
            service
                .transfer(TransferRequest {
                    sender_user_id: mary.user_id.clone(),
                    receiver_user_id: joe.user_id.clone(),
                    sender_account_id: mary.account_id.clone(),
                    receiver_account_id: joe.account_id.clone(),
                    amount: 1,
                })
                .await
                .unwrap_err(),
        ];

        for err in errors {
            assert_eq!(err.kind(), ErrorKind::NotActive, "{err}");
            assert!(err.to_string().starts_with("user not active"));
        }

        // mary was not debited by the rejected transfer
        assert_eq!(
            service
                .balance(BalanceRequest {
                    user_id: mary.user_id.clone(),
                    account_id: mary.account_id.clone(),
                })
                .await?
                .balance,
            20
        );
    }
    Ok(())
}

#[tokio::test]
async fn test_deactivation_is_idempotent() -> Result<()> {
    let service = LedgerService::in_memory(LedgerLayout::History);
    let joe = create_user(&service, "joe").await?;

    deactivate(&service, &joe.user_id).await?;
    deactivate(&service, &joe.user_id).await?;

    let err = service
        .balance(BalanceRequest {
            user_id: joe.user_id.clone(),
            account_id: joe.account_id.clone(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotActive);
    Ok(())
}

#[tokio::test]
async fn test_deactivate_unknown_user() {
    let service = LedgerService::in_memory(LedgerLayout::History);
    let user_id = new_id();

    assert_eq!(
        deactivate(&service, &user_id.to_string()).await,
        Err(AppError::Store(StoreError::UserNotFound(user_id)))
    );
}

#[tokio::test]
async fn test_deactivate_rejects_malformed_id() {
    let service = LedgerService::in_memory(LedgerLayout::History);

    assert_eq!(
        deactivate(&service, "").await,
        Err(AppError::InvalidInput("user id"))
    );
}
