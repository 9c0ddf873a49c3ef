use crate::config::TimingConfig;
use crate::core::persistence::PersistenceAdapter;
use crate::domain::model::{CallSite, Session, Severity, SubmitOutcome, UserProfile, View};
use crate::domain::ports::{Navigator, Notifier, RemoteGateway};
use crate::utils::error::{AppError, Result, ValidationError};
use crate::utils::tasks::{PendingTasks, SubmitGuard};
use crate::utils::validation::{is_valid_email, is_valid_password, is_valid_phone, MIN_NAME_LEN};
use chrono::Utc;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    /// email 或電話號碼
    pub identity: String,
    pub password: String,
    pub remember: bool,
}

impl LoginForm {
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        let identity = self.identity.trim();
        if identity.is_empty() || self.password.is_empty() {
            return Err(ValidationError::MissingFields);
        }
        if !is_valid_email(identity) && !is_valid_phone(identity) {
            return Err(ValidationError::InvalidIdentity);
        }
        if !is_valid_password(&self.password) {
            return Err(ValidationError::PasswordTooShort);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub accepted_terms: bool,
}

impl SignupForm {
    /// 一次只回報一個錯誤，順序與表單欄位相同
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        let (name, email, phone) = (self.name.trim(), self.email.trim(), self.phone.trim());
        if name.is_empty() || email.is_empty() || phone.is_empty() || self.password.is_empty() {
            return Err(ValidationError::MissingFields);
        }
        validate_field(FieldKind::Name, name)?;
        validate_field(FieldKind::Email, email)?;
        validate_field(FieldKind::Phone, phone)?;
        validate_field(FieldKind::Password, &self.password)?;
        if !self.accepted_terms {
            return Err(ValidationError::TermsNotAccepted);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Name,
    Email,
    Phone,
    Password,
}

/// 離開欄位時的即時檢查；空值留給送出時處理
pub fn validate_field(kind: FieldKind, value: &str) -> std::result::Result<(), ValidationError> {
    let value = match kind {
        FieldKind::Password => value,
        _ => value.trim(),
    };
    if value.is_empty() {
        return Ok(());
    }

    let error = match kind {
        FieldKind::Name if value.chars().count() < MIN_NAME_LEN => ValidationError::NameTooShort,
        FieldKind::Email if !is_valid_email(value) => ValidationError::InvalidEmail,
        FieldKind::Phone if !is_valid_phone(value) => ValidationError::InvalidPhone,
        FieldKind::Password if !is_valid_password(value) => ValidationError::PasswordTooShort,
        _ => return Ok(()),
    };
    Err(error)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocialProvider {
    Google,
    Facebook,
}

impl SocialProvider {
    pub fn name(&self) -> &'static str {
        match self {
            SocialProvider::Google => "Google",
            SocialProvider::Facebook => "Facebook",
        }
    }
}

/// 登入與註冊流程：驗證、呼叫遠端、儲存、導頁
pub struct AuthFlow {
    persistence: PersistenceAdapter,
    gateway: Arc<dyn RemoteGateway>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    timing: TimingConfig,
    login_guard: SubmitGuard,
    signup_guard: SubmitGuard,
    pending: PendingTasks,
}

impl AuthFlow {
    pub fn new(
        persistence: PersistenceAdapter,
        gateway: Arc<dyn RemoteGateway>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
        timing: TimingConfig,
    ) -> Self {
        Self {
            persistence,
            gateway,
            notifier,
            navigator,
            timing,
            login_guard: SubmitGuard::new(),
            signup_guard: SubmitGuard::new(),
            pending: PendingTasks::new(),
        }
    }

    pub fn is_login_pending(&self) -> bool {
        self.login_guard.is_disabled()
    }

    pub fn is_signup_pending(&self) -> bool {
        self.signup_guard.is_disabled()
    }

    pub async fn login(&self, form: &LoginForm) -> Result<SubmitOutcome<Session>> {
        let Some(_permit) = self.login_guard.try_acquire() else {
            tracing::debug!("Login already in flight, ignoring submit");
            return Ok(SubmitOutcome::Busy);
        };

        if let Err(e) = form.validate() {
            self.report_validation(&e);
            return Err(e.into());
        }

        if let Err(e) = self.gateway.call(CallSite::Auth).await {
            tracing::warn!("Login call failed: {}", e);
            self.notify("Login failed. Please try again.", Severity::Error);
            return Err(AppError::RemoteCallFailure {
                site: CallSite::Auth.to_string(),
            });
        }

        let session = Session {
            identity: form.identity.trim().to_string(),
            login_time: Utc::now(),
            remember: form.remember,
        };
        if let Err(e) = self.persistence.save_session(&session) {
            self.notify(&e.user_message(), Severity::Error);
            return Err(e);
        }

        tracing::info!("Signed in as {} (remember: {})", session.identity, session.remember);
        self.notify(
            "Login Successful! Welcome back to School Link Transport",
            Severity::Success,
        );
        self.redirect(View::Dashboard);

        Ok(SubmitOutcome::Completed(session))
    }

    pub async fn signup(&self, form: &SignupForm) -> Result<SubmitOutcome<UserProfile>> {
        let Some(_permit) = self.signup_guard.try_acquire() else {
            tracing::debug!("Signup already in flight, ignoring submit");
            return Ok(SubmitOutcome::Busy);
        };

        if let Err(e) = form.validate() {
            self.report_validation(&e);
            return Err(e.into());
        }

        if let Err(e) = self.gateway.call(CallSite::Auth).await {
            tracing::warn!("Signup call failed: {}", e);
            self.notify("Signup failed. Please try again.", Severity::Error);
            return Err(AppError::RemoteCallFailure {
                site: CallSite::Auth.to_string(),
            });
        }

        let profile = UserProfile {
            name: form.name.trim().to_string(),
            email: form.email.trim().to_string(),
            phone: form.phone.trim().to_string(),
            signup_time: Utc::now(),
        };
        if let Err(e) = self.persistence.save_profile(&profile) {
            self.notify(&e.user_message(), Severity::Error);
            return Err(e);
        }

        tracing::info!("Account created for {}", profile.email);
        self.notify(
            "Account Created! Welcome to School Link Transport",
            Severity::Success,
        );
        self.redirect(View::Dashboard);

        Ok(SubmitOutcome::Completed(profile))
    }

    /// 回傳是否已寄出重設連結；空白輸入視為取消
    pub fn forgot_password(&self, email: &str) -> bool {
        let email = email.trim();
        if email.is_empty() {
            return false;
        }
        if is_valid_email(email) {
            self.notify("Password reset link sent to your email", Severity::Success);
            true
        } else {
            self.notify(&ValidationError::InvalidEmail.to_string(), Severity::Error);
            false
        }
    }

    pub fn social_login(&self, provider: SocialProvider) {
        self.notify(
            &format!("{} login coming soon!", provider.name()),
            Severity::Info,
        );
    }

    pub async fn settle(&self) {
        self.pending.settle().await;
    }

    // 只有缺欄位會跳通知，其餘錯誤顯示在欄位旁
    fn report_validation(&self, error: &ValidationError) {
        tracing::debug!("Form validation failed: {}", error);
        if *error == ValidationError::MissingFields {
            self.notify(&error.to_string(), Severity::Error);
        }
    }

    fn redirect(&self, view: View) {
        let navigator = Arc::clone(&self.navigator);
        self.pending
            .defer(self.timing.redirect_delay(), move || navigator.navigate(view));
    }

    fn notify(&self, message: &str, severity: Severity) {
        self.notifier
            .notify(message, severity, self.timing.toast_duration());
    }
}
