use anyhow::Context as _;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr, Statement,
    TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

use kolo_domain::limits::{Channel, Counter, DEFAULT_COUNTER_JSON, Limits};
use kolo_domain::pagination::{PAGE_SIZE, PageRequest};
use kolo_bank_schema::{limit_upgrade_requests, tokens, transactions, user_details, users};

use crate::domain::repository::{
    AccountRepository, ApproveOutcome, CancelOutcome, InsertDetailsOutcome, InsertUserOutcome,
    LedgerRepository, ReserveOutcome, TokenRepository, TransactionRepository,
    UpgradeRequestRepository, UserRepository,
};
use crate::domain::types::{
    AccountDetails, AccountProfile, Token, Transaction, TransactionStatus, TransactionType,
    UpgradeLimitRequest, UpgradeStatus, User,
};
use crate::error::BankServiceError;

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn create(&self, user: &User) -> Result<InsertUserOutcome, BankServiceError> {
        let result = users::ActiveModel {
            id: Set(user.id),
            name: Set(user.name.clone()),
            username: Set(user.username.clone()),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            phone_number: Set(user.phone_number.clone()),
            activated: Set(user.activated),
            kyc_level: Set(user.kyc_level),
            device_id: Set(user.device_id.clone()),
            device_os: Set(user.device_os.clone()),
            device_name: Set(user.device_name.clone()),
            source: Set(user.source.clone()),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
        .insert(&self.db)
        .await;

        match result {
            Ok(_) => Ok(InsertUserOutcome::Created),
            Err(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(detail)) => {
                    if detail.contains("email") {
                        Ok(InsertUserOutcome::DuplicateEmail)
                    } else {
                        Ok(InsertUserOutcome::DuplicateUsername)
                    }
                }
                _ => Err(anyhow::Error::new(e).context("create user").into()),
            },
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, BankServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        name: model.name,
        username: model.username,
        email: model.email,
        password_hash: model.password_hash,
        phone_number: model.phone_number,
        activated: model.activated,
        kyc_level: model.kyc_level,
        device_id: model.device_id,
        device_os: model.device_os,
        device_name: model.device_name,
        source: model.source,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Token repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTokenRepository {
    pub db: DatabaseConnection,
}

impl TokenRepository for DbTokenRepository {
    async fn insert(&self, token: &Token) -> Result<(), BankServiceError> {
        tokens::ActiveModel {
            hash: Set(token.hash.clone()),
            user_id: Set(token.user_id),
            scope: Set(token.scope.clone()),
            expiry: Set(token.expiry),
        }
        .insert(&self.db)
        .await
        .context("insert token")?;
        Ok(())
    }

    async fn find_user(
        &self,
        scope: &str,
        hash: &[u8],
    ) -> Result<Option<(User, chrono::DateTime<Utc>)>, BankServiceError> {
        let Some((token, user)) = tokens::Entity::find_by_id(hash.to_vec())
            .filter(tokens::Column::Scope.eq(scope))
            .find_also_related(users::Entity)
            .one(&self.db)
            .await
            .context("find user by token")?
        else {
            return Ok(None);
        };
        let Some(user) = user else {
            return Ok(None);
        };
        Ok(Some((user_from_model(user), token.expiry)))
    }
}

// ── Account repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAccountRepository {
    pub db: DatabaseConnection,
}

impl AccountRepository for DbAccountRepository {
    async fn create_details(
        &self,
        details: &AccountDetails,
    ) -> Result<InsertDetailsOutcome, BankServiceError> {
        let result = user_details::ActiveModel {
            user_id: Set(details.user_id),
            account_number: Set(details.account_number.clone()),
            transaction_pin: Set(details.transaction_pin.clone()),
            limits: Set(serde_json::to_value(details.limits).context("encode limits blob")?),
            counter: Set(serde_json::to_value(details.counter).context("encode counter blob")?),
            counter_date: Set(details.counter_date),
            created_at: Set(details.created_at),
            updated_at: Set(details.updated_at),
        }
        .insert(&self.db)
        .await;

        match result {
            Ok(_) => Ok(InsertDetailsOutcome::Created),
            Err(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(detail)) => {
                    if detail.contains("account_number") {
                        Ok(InsertDetailsOutcome::DuplicateAccountNumber)
                    } else {
                        Ok(InsertDetailsOutcome::DuplicateUser)
                    }
                }
                _ => Err(anyhow::Error::new(e).context("create account details").into()),
            },
        }
    }

    async fn find_details(
        &self,
        user_id: Uuid,
    ) -> Result<Option<AccountDetails>, BankServiceError> {
        let model = user_details::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .context("find account details")?;
        model.map(details_from_model).transpose()
    }

    async fn set_pin(&self, user_id: Uuid, pin_hash: &str) -> Result<bool, BankServiceError> {
        let result = user_details::Entity::update_many()
            .filter(user_details::Column::UserId.eq(user_id))
            .col_expr(
                user_details::Column::TransactionPin,
                Expr::value(pin_hash.to_owned()),
            )
            .col_expr(user_details::Column::UpdatedAt, Expr::value(Utc::now()))
            .exec(&self.db)
            .await
            .context("set transaction pin")?;
        Ok(result.rows_affected > 0)
    }

    async fn get_profile(
        &self,
        user_id: Uuid,
    ) -> Result<Option<AccountProfile>, BankServiceError> {
        let Some((user, details)) = users::Entity::find_by_id(user_id)
            .find_also_related(user_details::Entity)
            .one(&self.db)
            .await
            .context("get account profile")?
        else {
            return Ok(None);
        };
        let Some(details) = details else {
            return Ok(None);
        };
        Ok(Some(AccountProfile {
            name: user.name,
            username: user.username,
            email: user.email,
            phone_number: user.phone_number,
            kyc_level: user.kyc_level,
            account_number: details.account_number,
        }))
    }
}

fn details_from_model(model: user_details::Model) -> Result<AccountDetails, BankServiceError> {
    let limits = Limits::from_blob(&model.limits).context("parse limits blob")?;
    let counter = Counter::from_blob(&model.counter).context("parse counter blob")?;
    Ok(AccountDetails {
        user_id: model.user_id,
        account_number: model.account_number,
        transaction_pin: model.transaction_pin,
        limits,
        counter,
        counter_date: model.counter_date,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Ledger repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbLedgerRepository {
    pub db: DatabaseConnection,
}

impl LedgerRepository for DbLedgerRepository {
    async fn get_limits(&self, user_id: Uuid) -> Result<Option<Limits>, BankServiceError> {
        let model = user_details::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .context("get limits")?;
        let Some(model) = model else {
            return Ok(None);
        };
        let limits = Limits::from_blob(&model.limits).context("parse limits blob")?;
        Ok(Some(limits))
    }

    async fn get_counter(&self, user_id: Uuid) -> Result<Option<Counter>, BankServiceError> {
        let model = user_details::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .context("get counter")?;
        let Some(model) = model else {
            return Ok(None);
        };
        let counter = Counter::from_blob(&model.counter).context("parse counter blob")?;
        let today = Utc::now().date_naive();
        if model.counter_date < today {
            return Ok(Some(Counter::zero()));
        }
        Ok(Some(counter))
    }

    async fn try_reserve(
        &self,
        user_id: Uuid,
        channel: Channel,
        amount: Decimal,
    ) -> Result<ReserveOutcome, BankServiceError> {
        // One conditional UPDATE guards the daily ceiling, folds in the
        // UTC day-boundary reset, increments the channel counter and returns
        // the updated blob. The channel name comes from the enum, so
        // inlining it into the statement text is safe.
        let name = channel.as_str();
        let sql = format!(
            r#"
            UPDATE user_details SET
                counter = jsonb_set(
                    CASE WHEN counter_date < CURRENT_DATE
                         THEN '{DEFAULT_COUNTER_JSON}'::jsonb
                         ELSE counter END,
                    '{{{name}}}',
                    to_jsonb(
                        (CASE WHEN counter_date < CURRENT_DATE
                              THEN 0
                              ELSE (counter->>'{name}')::numeric END) + $2::numeric
                    )
                ),
                counter_date = CURRENT_DATE,
                updated_at = now()
            WHERE user_id = $1
              AND (CASE WHEN counter_date < CURRENT_DATE
                        THEN 0
                        ELSE (counter->>'{name}')::numeric END) + $2::numeric
                  <= (limits->'{name}'->>'daily')::numeric
            RETURNING counter
            "#,
        );

        let row = self
            .db
            .query_one(Statement::from_sql_and_values(
                self.db.get_database_backend(),
                &sql,
                [user_id.into(), amount.into()],
            ))
            .await
            .context("reserve daily counter")?;

        if let Some(row) = row {
            let blob: serde_json::Value =
                row.try_get("", "counter").context("read updated counter")?;
            let counter = Counter::from_blob(&blob).context("parse updated counter blob")?;
            return Ok(ReserveOutcome::Reserved(counter));
        }

        // Zero rows: either the guard failed or the row does not exist.
        let exists = user_details::Entity::find_by_id(user_id)
            .select_only()
            .column(user_details::Column::UserId)
            .into_tuple::<Uuid>()
            .one(&self.db)
            .await
            .context("check account details existence")?;
        if exists.is_some() {
            Ok(ReserveOutcome::DailyExceeded)
        } else {
            Ok(ReserveOutcome::MissingRow)
        }
    }

    async fn release(
        &self,
        user_id: Uuid,
        channel: Channel,
        amount: Decimal,
    ) -> Result<(), BankServiceError> {
        // Compensating decrement, floored at zero. Only touches today's
        // counter; once the day rolls over there is nothing to give back.
        let name = channel.as_str();
        let sql = format!(
            r#"
            UPDATE user_details SET
                counter = jsonb_set(
                    counter,
                    '{{{name}}}',
                    to_jsonb(GREATEST((counter->>'{name}')::numeric - $2::numeric, 0))
                ),
                updated_at = now()
            WHERE user_id = $1 AND counter_date = CURRENT_DATE
            "#,
        );

        self.db
            .execute(Statement::from_sql_and_values(
                self.db.get_database_backend(),
                &sql,
                [user_id.into(), amount.into()],
            ))
            .await
            .context("release daily counter")?;
        Ok(())
    }
}

// ── Upgrade request repository ───────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUpgradeRequestRepository {
    pub db: DatabaseConnection,
}

impl UpgradeRequestRepository for DbUpgradeRequestRepository {
    async fn create(&self, request: &UpgradeLimitRequest) -> Result<(), BankServiceError> {
        limit_upgrade_requests::ActiveModel {
            id: Set(request.id),
            user_id: Set(request.user_id),
            channel: Set(request.channel.as_str().to_owned()),
            single: Set(request.single),
            daily: Set(request.daily),
            status: Set(request.status.as_str().to_owned()),
            created_at: Set(request.created_at),
            updated_at: Set(request.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create limit upgrade request")?;
        Ok(())
    }

    async fn approve(&self, request_id: Uuid) -> Result<ApproveOutcome, BankServiceError> {
        let outcome = self
            .db
            .transaction::<_, ApproveOutcome, DbErr>(|txn| {
                Box::pin(async move {
                    let Some(model) =
                        limit_upgrade_requests::Entity::find_by_id(request_id).one(txn).await?
                    else {
                        return Ok(ApproveOutcome::NotFound);
                    };
                    let request = upgrade_request_from_model(&model)?;

                    match request.status {
                        UpgradeStatus::Completed => {
                            return Ok(ApproveOutcome::AlreadyCompleted(request));
                        }
                        UpgradeStatus::Cancelled => return Ok(ApproveOutcome::Cancelled),
                        UpgradeStatus::Pending => {}
                    }

                    let now = Utc::now();
                    let mut am: limit_upgrade_requests::ActiveModel = model.into();
                    am.status = Set(UpgradeStatus::Completed.as_str().to_owned());
                    am.updated_at = Set(now);
                    am.update(txn).await?;

                    // Overwrite the live limits channel in the same txn.
                    let name = request.channel.as_str();
                    let sql = format!(
                        r#"
                        UPDATE user_details SET
                            limits = jsonb_set(
                                limits,
                                '{{{name}}}',
                                jsonb_build_object('single', $2::numeric, 'daily', $3::numeric)
                            ),
                            updated_at = now()
                        WHERE user_id = $1
                        "#,
                    );
                    txn.execute(Statement::from_sql_and_values(
                        txn.get_database_backend(),
                        &sql,
                        [request.user_id.into(), request.single.into(), request.daily.into()],
                    ))
                    .await?;

                    Ok(ApproveOutcome::Applied(UpgradeLimitRequest {
                        status: UpgradeStatus::Completed,
                        updated_at: now,
                        ..request
                    }))
                })
            })
            .await
            .context("approve limit upgrade request")?;
        Ok(outcome)
    }

    async fn cancel(&self, request_id: Uuid) -> Result<CancelOutcome, BankServiceError> {
        let outcome = self
            .db
            .transaction::<_, CancelOutcome, DbErr>(|txn| {
                Box::pin(async move {
                    let Some(model) =
                        limit_upgrade_requests::Entity::find_by_id(request_id).one(txn).await?
                    else {
                        return Ok(CancelOutcome::NotFound);
                    };
                    let request = upgrade_request_from_model(&model)?;

                    match request.status {
                        UpgradeStatus::Cancelled => {
                            return Ok(CancelOutcome::AlreadyCancelled(request));
                        }
                        UpgradeStatus::Completed => return Ok(CancelOutcome::Completed),
                        UpgradeStatus::Pending => {}
                    }

                    let now = Utc::now();
                    let mut am: limit_upgrade_requests::ActiveModel = model.into();
                    am.status = Set(UpgradeStatus::Cancelled.as_str().to_owned());
                    am.updated_at = Set(now);
                    am.update(txn).await?;

                    Ok(CancelOutcome::Cancelled(UpgradeLimitRequest {
                        status: UpgradeStatus::Cancelled,
                        updated_at: now,
                        ..request
                    }))
                })
            })
            .await
            .context("cancel limit upgrade request")?;
        Ok(outcome)
    }
}

fn upgrade_request_from_model(
    model: &limit_upgrade_requests::Model,
) -> Result<UpgradeLimitRequest, DbErr> {
    let channel = Channel::from_name(&model.channel)
        .ok_or_else(|| DbErr::Custom(format!("unknown channel `{}`", model.channel)))?;
    let status = UpgradeStatus::from_name(&model.status)
        .ok_or_else(|| DbErr::Custom(format!("unknown request status `{}`", model.status)))?;
    Ok(UpgradeLimitRequest {
        id: model.id,
        user_id: model.user_id,
        channel,
        single: model.single,
        daily: model.daily,
        status,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Transaction repository ───────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTransactionRepository {
    pub db: DatabaseConnection,
}

impl TransactionRepository for DbTransactionRepository {
    async fn insert(&self, transaction: &Transaction) -> Result<(), BankServiceError> {
        transactions::ActiveModel {
            id: Set(transaction.id),
            user_id: Set(transaction.user_id),
            transaction_type: Set(transaction.transaction_type.as_str().to_owned()),
            source: Set(transaction.source.as_str().to_owned()),
            narration: Set(transaction.narration.clone()),
            account_number: Set(transaction.account_number.clone()),
            request_id: Set(transaction.request_id.clone()),
            internal_reference: Set(transaction.internal_reference.clone()),
            external_reference: Set(transaction.external_reference.clone()),
            amount: Set(transaction.amount),
            status: Set(transaction.status.as_str().to_owned()),
            commission: Set(transaction.commission),
            balance_after: Set(transaction.balance_after),
            created_at: Set(transaction.created_at),
            updated_at: Set(transaction.updated_at),
        }
        .insert(&self.db)
        .await
        .context("insert transaction")?;
        Ok(())
    }

    async fn list_by_account(
        &self,
        account_number: &str,
        page: PageRequest,
    ) -> Result<Vec<Transaction>, BankServiceError> {
        let page = page.clamped();
        let models = transactions::Entity::find()
            .filter(transactions::Column::AccountNumber.eq(account_number))
            .order_by_desc(transactions::Column::CreatedAt)
            .offset(page.offset())
            .limit(PAGE_SIZE as u64)
            .all(&self.db)
            .await
            .context("list transactions by account")?;
        models.into_iter().map(transaction_from_model).collect()
    }
}

fn transaction_from_model(model: transactions::Model) -> Result<Transaction, BankServiceError> {
    let transaction_type = TransactionType::from_name(&model.transaction_type)
        .ok_or_else(|| anyhow::anyhow!("unknown transaction type `{}`", model.transaction_type))?;
    let source = Channel::from_name(&model.source)
        .ok_or_else(|| anyhow::anyhow!("unknown transaction source `{}`", model.source))?;
    let status = TransactionStatus::from_name(&model.status)
        .ok_or_else(|| anyhow::anyhow!("unknown transaction status `{}`", model.status))?;
    Ok(Transaction {
        id: model.id,
        user_id: model.user_id,
        transaction_type,
        source,
        narration: model.narration,
        account_number: model.account_number,
        request_id: model.request_id,
        internal_reference: model.internal_reference,
        external_reference: model.external_reference,
        amount: model.amount,
        status,
        commission: model.commission,
        balance_after: model.balance_after,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}
