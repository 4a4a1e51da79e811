use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::{
    Account, AccountId, AccountLedger, Amount, LedgerEntry, LedgerLayout, User, UserId, parse_id,
};
use crate::storage::{
    AccountStore, HistoryStore, InMemoryAccountStore, InMemoryHistoryStore, InMemoryUserStore,
    UserStore,
};

use super::{
    AppError, BalanceRequest, BalanceResponse, CreateAccountRequest, CreateAccountResponse,
    CreateUserRequest, CreateUserResponse, DeactivateUserRequest, DepositRequest, DepositResponse,
    HistoryRequest, HistoryResponse, TransferRequest, TransferResponse, WithdrawRequest,
    WithdrawResponse,
};

/// Application service providing the ledger operations.
///
/// Every operation follows the same shape: validate the request, authorize
/// the acting user against the account, read current state, compute, then
/// commit writes in a fixed order. The service holds no state of its own and
/// never holds more than one store lock at a time.
///
/// Multi-step writes are not atomic. If a transfer fails after the sender's
/// balance was written, earlier writes stay committed and the store error is
/// returned as-is.
pub struct LedgerService {
    users: Arc<dyn UserStore>,
    accounts: Arc<dyn AccountStore>,
    histories: Arc<dyn HistoryStore>,
    layout: LedgerLayout,
}

impl LedgerService {
    /// Create a new ledger service over the given stores. `layout` decides
    /// where ledgers of newly created accounts are kept.
    pub fn new(
        users: Arc<dyn UserStore>,
        accounts: Arc<dyn AccountStore>,
        histories: Arc<dyn HistoryStore>,
        layout: LedgerLayout,
    ) -> Self {
        Self {
            users,
            accounts,
            histories,
            layout,
        }
    }

    /// A service backed by fresh in-memory stores.
    pub fn in_memory(layout: LedgerLayout) -> Self {
        Self::new(
            Arc::new(InMemoryUserStore::new()),
            Arc::new(InMemoryAccountStore::new()),
            Arc::new(InMemoryHistoryStore::new()),
            layout,
        )
    }

    pub fn layout(&self) -> LedgerLayout {
        self.layout
    }

    // ========================
    // User operations
    // ========================

    /// Create a user together with their first account.
    pub async fn create_user(&self, req: CreateUserRequest) -> Result<CreateUserResponse, AppError> {
        if req.name.is_empty() {
            return Err(AppError::InvalidInput("user name"));
        }

        debug!(name = %req.name, "create user requested");

        let account = self.new_account().await?;
        let user = self.users.create(&req.name).await?;
        self.users.add_account_id(user.id, account.id).await?;

        info!(user_id = %user.id, account_id = %account.id, "user created");

        Ok(CreateUserResponse {
            user_id: user.id,
            account_ids: vec![account.id],
        })
    }

    /// Open an additional account for an existing, active user.
    pub async fn create_account(
        &self,
        req: CreateAccountRequest,
    ) -> Result<CreateAccountResponse, AppError> {
        let user_id = parse_id(&req.user_id).ok_or(AppError::InvalidInput("user id"))?;

        debug!(%user_id, "create account requested");

        let account = self.new_account().await?;
        self.users.add_account_id(user_id, account.id).await?;

        info!(%user_id, account_id = %account.id, "account created");

        Ok(CreateAccountResponse {
            account_id: account.id,
        })
    }

    /// Deactivate a user. Deactivating an inactive user is a no-op.
    pub async fn deactivate_user(&self, req: DeactivateUserRequest) -> Result<(), AppError> {
        let user_id = parse_id(&req.user_id).ok_or(AppError::InvalidInput("user id"))?;

        debug!(%user_id, "deactivate requested");

        self.users.update_status(user_id, false).await?;

        info!(%user_id, "user deactivated");
        Ok(())
    }

    // ========================
    // Balance operations
    // ========================

    pub async fn deposit(&self, req: DepositRequest) -> Result<DepositResponse, AppError> {
        let user_id = parse_id(&req.user_id).ok_or(AppError::InvalidInput("user id"))?;
        let account_id = parse_id(&req.account_id).ok_or(AppError::InvalidInput("account id"))?;
        validate_amount(req.amount)?;

        debug!(%user_id, %account_id, amount = req.amount, "deposit requested");

        self.authorize(user_id, account_id).await?;
        let account = self.accounts.read(account_id).await?;

        let balance = account
            .balance
            .checked_add(req.amount)
            .ok_or(AppError::BalanceOverflow(account_id))?;

        self.accounts.update_balance(account_id, balance).await?;
        self.append_entry(&account, LedgerEntry::deposit(req.amount))
            .await?;

        info!(%account_id, amount = req.amount, balance, "deposit committed");
        Ok(DepositResponse { balance })
    }

    pub async fn withdraw(&self, req: WithdrawRequest) -> Result<WithdrawResponse, AppError> {
        let user_id = parse_id(&req.user_id).ok_or(AppError::InvalidInput("user id"))?;
        let account_id = parse_id(&req.account_id).ok_or(AppError::InvalidInput("account id"))?;
        validate_amount(req.amount)?;

        debug!(%user_id, %account_id, amount = req.amount, "withdraw requested");

        self.authorize(user_id, account_id).await?;
        let account = self.accounts.read(account_id).await?;

        ensure_funds(&account, req.amount)?;
        let balance = account.balance - req.amount;

        self.accounts.update_balance(account_id, balance).await?;
        self.append_entry(&account, LedgerEntry::withdraw(req.amount))
            .await?;

        info!(%account_id, amount = req.amount, balance, "withdraw committed");
        Ok(WithdrawResponse { balance })
    }

    /// Move `amount` from the sender's account to the receiver's account.
    /// Returns the sender's new balance.
    pub async fn transfer(&self, req: TransferRequest) -> Result<TransferResponse, AppError> {
        let sender_user_id =
            parse_id(&req.sender_user_id).ok_or(AppError::InvalidInput("sender user id"))?;
        let receiver_user_id =
            parse_id(&req.receiver_user_id).ok_or(AppError::InvalidInput("receiver user id"))?;
        let sender_account_id = parse_id(&req.sender_account_id)
            .ok_or(AppError::InvalidInput("sender account id"))?;
        let receiver_account_id = parse_id(&req.receiver_account_id)
            .ok_or(AppError::InvalidInput("receiver account id"))?;
        validate_amount(req.amount)?;

        if sender_account_id == receiver_account_id {
            return Err(AppError::SameAccount(sender_account_id));
        }

        debug!(
            %sender_account_id,
            %receiver_account_id,
            amount = req.amount,
            "transfer requested"
        );

        self.authorize(sender_user_id, sender_account_id).await?;
        let sender_account = self.accounts.read(sender_account_id).await?;
        ensure_funds(&sender_account, req.amount)?;

        self.authorize(receiver_user_id, receiver_account_id).await?;
        let receiver_account = self.accounts.read(receiver_account_id).await?;

        let sender_balance = sender_account.balance - req.amount;
        let receiver_balance = receiver_account
            .balance
            .checked_add(req.amount)
            .ok_or(AppError::BalanceOverflow(receiver_account_id))?;

        self.accounts
            .update_balance(sender_account_id, sender_balance)
            .await?;

        // From here on the transfer is partially applied if anything fails.
        let committed = async {
            self.accounts
                .update_balance(receiver_account_id, receiver_balance)
                .await?;
            self.append_entry(
                &sender_account,
                LedgerEntry::transfer_out(req.amount, receiver_user_id, receiver_account_id),
            )
            .await?;
            self.append_entry(
                &receiver_account,
                LedgerEntry::transfer_in(req.amount, sender_user_id, sender_account_id),
            )
            .await
        }
        .await;

        if let Err(err) = committed {
            warn!(
                %sender_account_id,
                %receiver_account_id,
                amount = req.amount,
                error = %err,
                "transfer partially applied"
            );
            return Err(err);
        }

        info!(
            %sender_account_id,
            %receiver_account_id,
            amount = req.amount,
            sender_balance,
            "transfer committed"
        );
        Ok(TransferResponse {
            balance: sender_balance,
        })
    }

    // ========================
    // Queries
    // ========================

    pub async fn balance(&self, req: BalanceRequest) -> Result<BalanceResponse, AppError> {
        let user_id = parse_id(&req.user_id).ok_or(AppError::InvalidInput("user id"))?;
        let account_id = parse_id(&req.account_id).ok_or(AppError::InvalidInput("account id"))?;

        debug!(%user_id, %account_id, "balance requested");

        self.authorize(user_id, account_id).await?;
        let account = self.accounts.read(account_id).await?;

        Ok(BalanceResponse {
            balance: account.balance,
        })
    }

    /// The account's full ledger, oldest first.
    pub async fn history(&self, req: HistoryRequest) -> Result<HistoryResponse, AppError> {
        let user_id = parse_id(&req.user_id).ok_or(AppError::InvalidInput("user id"))?;
        let account_id = parse_id(&req.account_id).ok_or(AppError::InvalidInput("account id"))?;

        debug!(%user_id, %account_id, "history requested");

        self.authorize(user_id, account_id).await?;
        let account = self.accounts.read(account_id).await?;

        let events = match account.ledger {
            AccountLedger::Inline { transactions } => transactions,
            AccountLedger::History { history_id } => self.histories.read(history_id).await?.events,
        };

        Ok(HistoryResponse { events })
    }

    // ========================
    // Helpers
    // ========================

    /// Read the active user and check they own `account_id`.
    async fn authorize(&self, user_id: UserId, account_id: AccountId) -> Result<User, AppError> {
        let user = self.users.read(user_id).await?;
        if !user.owns(account_id) {
            return Err(AppError::Unauthorized {
                user_id,
                account_id,
            });
        }
        Ok(user)
    }

    async fn new_account(&self) -> Result<Account, AppError> {
        let history_id = match self.layout {
            LedgerLayout::History => Some(self.histories.create().await?.id),
            LedgerLayout::Inline => None,
        };
        Ok(self.accounts.create(history_id).await?)
    }

    /// Append to wherever this account keeps its ledger.
    async fn append_entry(&self, account: &Account, entry: LedgerEntry) -> Result<(), AppError> {
        match account.ledger {
            AccountLedger::Inline { .. } => {
                self.accounts.append_transaction(account.id, entry).await?
            }
            AccountLedger::History { history_id } => {
                self.histories.append_event(history_id, entry).await?
            }
        }
        Ok(())
    }
}

fn validate_amount(amount: Amount) -> Result<(), AppError> {
    if amount <= 0 {
        return Err(AppError::InvalidInput("amount"));
    }
    Ok(())
}

fn ensure_funds(account: &Account, amount: Amount) -> Result<(), AppError> {
    if account.balance < amount {
        return Err(AppError::InsufficientFunds {
            account_id: account.id,
            balance: account.balance,
            required: amount,
        });
    }
    Ok(())
}
