//! Rule Service
//!
//! Handles house rule operations: listing, creation, amendment, deletion,
//! and the housemate announcement that accompanies every change.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{
    HouseRepository, HousingAssignmentRepository, Notification, NotificationRepository, Rule,
    RuleRepository, UserRepository, MAX_CONTENT_CHARS, MIN_CONTENT_CHARS,
};
use crate::shared::snowflake::SnowflakeGenerator;

/// Rule service trait
#[async_trait]
pub trait RuleService: Send + Sync {
    /// List the rules of a house for a given user
    async fn list_rules(&self, user_id: i64, house_id: i64) -> Result<RuleListing, RuleError>;

    /// Add a rule to a house
    async fn create_rule(
        &self,
        user_id: i64,
        house_id: i64,
        content: &str,
    ) -> Result<RuleDto, RuleError>;

    /// Amend a rule's content
    async fn update_rule(
        &self,
        user_id: i64,
        house_id: i64,
        rule_id: i64,
        content: &str,
    ) -> Result<RuleDto, RuleError>;

    /// Remove a rule from a house
    async fn delete_rule(&self, user_id: i64, house_id: i64, rule_id: i64)
        -> Result<(), RuleError>;
}

/// Outcome of a rule listing request.
///
/// A caller browsing a house other than their home house is sent to their
/// home house instead of being shown the other house's rules.
#[derive(Debug, Clone)]
pub enum RuleListing {
    /// The requested house is the caller's home house
    Rules(Vec<RuleDto>),
    /// The caller lives elsewhere; their home house ID
    HomeHouse(i64),
}

/// Rule data transfer object
#[derive(Debug, Clone)]
pub struct RuleDto {
    pub id: String,
    pub house_id: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Rule> for RuleDto {
    fn from(rule: Rule) -> Self {
        Self {
            id: rule.id.to_string(),
            house_id: rule.house_id.to_string(),
            content: rule.content,
            created_at: rule.created_at.to_rfc3339(),
            updated_at: rule.updated_at.to_rfc3339(),
        }
    }
}

/// Rule service errors
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("Rule not found")]
    NotFound,

    #[error("House not found")]
    HouseNotFound,

    #[error("Permission denied")]
    Forbidden,

    #[error("Not assigned to any house")]
    NoHouse,

    #[error("User not found")]
    UserNotFound,

    #[error("Rule content too short")]
    ContentTooShort,

    #[error("Rule content too long")]
    ContentTooLong,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// RuleService implementation
pub struct RuleServiceImpl<R, H, A, N, U>
where
    R: RuleRepository,
    H: HouseRepository,
    A: HousingAssignmentRepository,
    N: NotificationRepository,
    U: UserRepository,
{
    rule_repo: Arc<R>,
    house_repo: Arc<H>,
    assignment_repo: Arc<A>,
    notification_repo: Arc<N>,
    user_repo: Arc<U>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl<R, H, A, N, U> RuleServiceImpl<R, H, A, N, U>
where
    R: RuleRepository,
    H: HouseRepository,
    A: HousingAssignmentRepository,
    N: NotificationRepository,
    U: UserRepository,
{
    pub fn new(
        rule_repo: Arc<R>,
        house_repo: Arc<H>,
        assignment_repo: Arc<A>,
        notification_repo: Arc<N>,
        user_repo: Arc<U>,
        id_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            rule_repo,
            house_repo,
            assignment_repo,
            notification_repo,
            user_repo,
            id_generator,
        }
    }

    fn validate_content(&self, content: &str) -> Result<(), RuleError> {
        let chars = content.chars().count();
        if chars < MIN_CONTENT_CHARS {
            return Err(RuleError::ContentTooShort);
        }
        if chars > MAX_CONTENT_CHARS {
            return Err(RuleError::ContentTooLong);
        }
        Ok(())
    }

    /// House must exist; returns whether the user is assigned to it.
    async fn check_house_access(&self, house_id: i64, user_id: i64) -> Result<bool, RuleError> {
        self.house_repo
            .find_by_id(house_id)
            .await
            .map_err(|e| RuleError::Internal(e.to_string()))?
            .ok_or(RuleError::HouseNotFound)?;

        let is_member = self
            .assignment_repo
            .is_member(house_id, user_id)
            .await
            .map_err(|e| RuleError::Internal(e.to_string()))?;

        Ok(is_member)
    }

    /// The announcement wording uses the acting housemate's first name.
    async fn actor_first_name(&self, user_id: i64) -> Result<String, RuleError> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await
            .map_err(|e| RuleError::Internal(e.to_string()))?
            .ok_or(RuleError::UserNotFound)?;

        Ok(user.first_name)
    }

    async fn notify_house(&self, notification: Notification) -> Result<(), RuleError> {
        let delivered = self
            .notification_repo
            .deliver_to_house(&notification)
            .await
            .map_err(|e| RuleError::Internal(e.to_string()))?;

        tracing::debug!(
            notification_id = delivered.notification.id,
            house_id = delivered.notification.house_id,
            recipients = delivered.recipients,
            "notification fanned out to housemates"
        );

        Ok(())
    }
}

#[async_trait]
impl<R, H, A, N, U> RuleService for RuleServiceImpl<R, H, A, N, U>
where
    R: RuleRepository + 'static,
    H: HouseRepository + 'static,
    A: HousingAssignmentRepository + 'static,
    N: NotificationRepository + 'static,
    U: UserRepository + 'static,
{
    async fn list_rules(&self, user_id: i64, house_id: i64) -> Result<RuleListing, RuleError> {
        let assignments = self
            .assignment_repo
            .find_by_user(user_id)
            .await
            .map_err(|e| RuleError::Internal(e.to_string()))?;

        // The earliest assignment is the user's home house
        let home = assignments.first().ok_or(RuleError::NoHouse)?;

        if home.house_id != house_id {
            return Ok(RuleListing::HomeHouse(home.house_id));
        }

        let rules = self
            .rule_repo
            .find_by_house(house_id)
            .await
            .map_err(|e| RuleError::Internal(e.to_string()))?;

        Ok(RuleListing::Rules(
            rules.into_iter().map(RuleDto::from).collect(),
        ))
    }

    async fn create_rule(
        &self,
        user_id: i64,
        house_id: i64,
        content: &str,
    ) -> Result<RuleDto, RuleError> {
        self.validate_content(content)?;

        if !self.check_house_access(house_id, user_id).await? {
            return Err(RuleError::Forbidden);
        }

        let first_name = self.actor_first_name(user_id).await?;

        let now = Utc::now();
        let rule = Rule {
            id: self.id_generator.generate(),
            house_id,
            content: content.to_string(),
            created_at: now,
            updated_at: now,
        };

        let created = self
            .rule_repo
            .create(&rule)
            .await
            .map_err(|e| RuleError::Internal(e.to_string()))?;

        let notification = Notification::rule_added(
            self.id_generator.generate(),
            house_id,
            &first_name,
            &created.content,
        );
        self.notify_house(notification).await?;

        Ok(RuleDto::from(created))
    }

    async fn update_rule(
        &self,
        user_id: i64,
        house_id: i64,
        rule_id: i64,
        content: &str,
    ) -> Result<RuleDto, RuleError> {
        self.validate_content(content)?;

        if !self.check_house_access(house_id, user_id).await? {
            return Err(RuleError::Forbidden);
        }

        let first_name = self.actor_first_name(user_id).await?;

        let mut rule = self
            .rule_repo
            .find_by_id(rule_id)
            .await
            .map_err(|e| RuleError::Internal(e.to_string()))?
            .ok_or(RuleError::NotFound)?;

        // Verify house matches
        if rule.house_id != house_id {
            return Err(RuleError::NotFound);
        }

        rule.content = content.to_string();

        let updated = self
            .rule_repo
            .update(&rule)
            .await
            .map_err(|e| RuleError::Internal(e.to_string()))?;

        // The announcement carries the amended wording
        let notification = Notification::rule_updated(
            self.id_generator.generate(),
            house_id,
            &first_name,
            &updated.content,
        );
        self.notify_house(notification).await?;

        Ok(RuleDto::from(updated))
    }

    async fn delete_rule(
        &self,
        user_id: i64,
        house_id: i64,
        rule_id: i64,
    ) -> Result<(), RuleError> {
        if !self.check_house_access(house_id, user_id).await? {
            return Err(RuleError::Forbidden);
        }

        let first_name = self.actor_first_name(user_id).await?;

        let rule = self
            .rule_repo
            .find_by_id(rule_id)
            .await
            .map_err(|e| RuleError::Internal(e.to_string()))?
            .ok_or(RuleError::NotFound)?;

        // Verify house matches
        if rule.house_id != house_id {
            return Err(RuleError::NotFound);
        }

        self.rule_repo
            .delete(rule_id)
            .await
            .map_err(|e| RuleError::Internal(e.to_string()))?;

        // The announcement carries the wording the rule had
        let notification = Notification::rule_deleted(
            self.id_generator.generate(),
            house_id,
            &first_name,
            &rule.content,
        );
        self.notify_house(notification).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DeliveredNotification, House, HousingAssignment, User};
    use crate::shared::error::AppError;
    use tokio_test::assert_ok;

    mockall::mock! {
        RuleRepo {}

        #[async_trait]
        impl RuleRepository for RuleRepo {
            async fn find_by_id(&self, id: i64) -> Result<Option<Rule>, AppError>;
            async fn find_by_house(&self, house_id: i64) -> Result<Vec<Rule>, AppError>;
            async fn create(&self, rule: &Rule) -> Result<Rule, AppError>;
            async fn update(&self, rule: &Rule) -> Result<Rule, AppError>;
            async fn delete(&self, id: i64) -> Result<(), AppError>;
        }
    }

    mockall::mock! {
        HouseRepo {}

        #[async_trait]
        impl HouseRepository for HouseRepo {
            async fn find_by_id(&self, id: i64) -> Result<Option<House>, AppError>;
            async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<House>, AppError>;
        }
    }

    mockall::mock! {
        AssignmentRepo {}

        #[async_trait]
        impl HousingAssignmentRepository for AssignmentRepo {
            async fn find_by_user(&self, user_id: i64) -> Result<Vec<HousingAssignment>, AppError>;
            async fn is_member(&self, house_id: i64, user_id: i64) -> Result<bool, AppError>;
        }
    }

    mockall::mock! {
        NotificationRepo {}

        #[async_trait]
        impl NotificationRepository for NotificationRepo {
            async fn deliver_to_house(
                &self,
                notification: &Notification,
            ) -> Result<DeliveredNotification, AppError>;
        }
    }

    mockall::mock! {
        UserRepo {}

        #[async_trait]
        impl UserRepository for UserRepo {
            async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;
            async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
            async fn create(&self, user: &User) -> Result<User, AppError>;
            async fn email_exists(&self, email: &str) -> Result<bool, AppError>;
        }
    }

    struct Mocks {
        rules: MockRuleRepo,
        houses: MockHouseRepo,
        assignments: MockAssignmentRepo,
        notifications: MockNotificationRepo,
        users: MockUserRepo,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                rules: MockRuleRepo::new(),
                houses: MockHouseRepo::new(),
                assignments: MockAssignmentRepo::new(),
                notifications: MockNotificationRepo::new(),
                users: MockUserRepo::new(),
            }
        }

        fn into_service(
            self,
        ) -> RuleServiceImpl<
            MockRuleRepo,
            MockHouseRepo,
            MockAssignmentRepo,
            MockNotificationRepo,
            MockUserRepo,
        > {
            RuleServiceImpl::new(
                Arc::new(self.rules),
                Arc::new(self.houses),
                Arc::new(self.assignments),
                Arc::new(self.notifications),
                Arc::new(self.users),
                Arc::new(SnowflakeGenerator::new(1, 1)),
            )
        }
    }

    fn house(id: i64) -> House {
        House {
            id,
            name: "Sunset Terrace".to_string(),
            ..Default::default()
        }
    }

    fn resident(id: i64, first_name: &str) -> User {
        User {
            id,
            first_name: first_name.to_string(),
            ..Default::default()
        }
    }

    fn delivered(n: &Notification) -> DeliveredNotification {
        DeliveredNotification {
            notification: n.clone(),
            recipients: 3,
        }
    }

    #[tokio::test]
    async fn test_list_redirects_to_home_house() {
        let mut mocks = Mocks::new();
        mocks
            .assignments
            .expect_find_by_user()
            .returning(|_| Ok(vec![HousingAssignment::new(10, 1), HousingAssignment::new(20, 1)]));

        let svc = mocks.into_service();
        let listing = svc.list_rules(1, 20).await.unwrap();

        assert!(matches!(listing, RuleListing::HomeHouse(10)));
    }

    #[tokio::test]
    async fn test_list_returns_rules_for_home_house() {
        let mut mocks = Mocks::new();
        mocks
            .assignments
            .expect_find_by_user()
            .returning(|_| Ok(vec![HousingAssignment::new(10, 1)]));
        mocks.rules.expect_find_by_house().returning(|house_id| {
            Ok(vec![Rule {
                id: 100,
                house_id,
                content: "quiet hours after 10pm".to_string(),
                ..Default::default()
            }])
        });

        let svc = mocks.into_service();
        let listing = svc.list_rules(1, 10).await.unwrap();

        match listing {
            RuleListing::Rules(rules) => {
                assert_eq!(rules.len(), 1);
                assert_eq!(rules[0].content, "quiet hours after 10pm");
                assert_eq!(rules[0].house_id, "10");
            }
            other => panic!("expected rules, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_list_without_assignment_is_rejected() {
        let mut mocks = Mocks::new();
        mocks
            .assignments
            .expect_find_by_user()
            .returning(|_| Ok(vec![]));

        let svc = mocks.into_service();
        let result = svc.list_rules(1, 10).await;

        assert!(matches!(result, Err(RuleError::NoHouse)));
    }

    #[tokio::test]
    async fn test_create_rejects_short_content() {
        let svc = Mocks::new().into_service();

        let result = svc.create_rule(1, 10, "nope").await;

        assert!(matches!(result, Err(RuleError::ContentTooShort)));
    }

    #[tokio::test]
    async fn test_create_rejects_long_content() {
        let svc = Mocks::new().into_service();
        let content = "x".repeat(MAX_CONTENT_CHARS + 1);

        let result = svc.create_rule(1, 10, &content).await;

        assert!(matches!(result, Err(RuleError::ContentTooLong)));
    }

    #[tokio::test]
    async fn test_create_rejects_non_resident() {
        let mut mocks = Mocks::new();
        mocks
            .houses
            .expect_find_by_id()
            .returning(|id| Ok(Some(house(id))));
        mocks.assignments.expect_is_member().returning(|_, _| Ok(false));

        let svc = mocks.into_service();
        let result = svc.create_rule(1, 10, "no loud music on weekdays").await;

        assert!(matches!(result, Err(RuleError::Forbidden)));
    }

    #[tokio::test]
    async fn test_create_unknown_house_is_not_found() {
        let mut mocks = Mocks::new();
        mocks.houses.expect_find_by_id().returning(|_| Ok(None));

        let svc = mocks.into_service();
        let result = svc.create_rule(1, 99, "no loud music on weekdays").await;

        assert!(matches!(result, Err(RuleError::HouseNotFound)));
    }

    #[tokio::test]
    async fn test_create_persists_and_announces() {
        let mut mocks = Mocks::new();
        mocks
            .houses
            .expect_find_by_id()
            .returning(|id| Ok(Some(house(id))));
        mocks.assignments.expect_is_member().returning(|_, _| Ok(true));
        mocks
            .users
            .expect_find_by_id()
            .returning(|id| Ok(Some(resident(id, "Jake"))));
        mocks.rules.expect_create().returning(|r| Ok(r.clone()));
        mocks
            .notifications
            .expect_deliver_to_house()
            .withf(|n: &Notification| {
                n.alert == "Jake has added no dishes in the sink overnight to the house rules."
                    && n.category == "rules"
                    && n.house_id == 10
            })
            .times(1)
            .returning(|n| Ok(delivered(n)));

        let svc = mocks.into_service();
        let dto = svc
            .create_rule(1, 10, "no dishes in the sink overnight")
            .await
            .unwrap();

        assert_eq!(dto.content, "no dishes in the sink overnight");
        assert_eq!(dto.house_id, "10");
    }

    #[tokio::test]
    async fn test_update_announces_amended_wording() {
        let mut mocks = Mocks::new();
        mocks
            .houses
            .expect_find_by_id()
            .returning(|id| Ok(Some(house(id))));
        mocks.assignments.expect_is_member().returning(|_, _| Ok(true));
        mocks
            .users
            .expect_find_by_id()
            .returning(|id| Ok(Some(resident(id, "Amy"))));
        mocks.rules.expect_find_by_id().returning(|id| {
            Ok(Some(Rule {
                id,
                house_id: 10,
                content: "recycling goes out on Mondays".to_string(),
                ..Default::default()
            }))
        });
        mocks.rules.expect_update().returning(|r| Ok(r.clone()));
        mocks
            .notifications
            .expect_deliver_to_house()
            .withf(|n: &Notification| {
                n.alert == "Amy has updated recycling goes out on Tuesdays."
            })
            .times(1)
            .returning(|n| Ok(delivered(n)));

        let svc = mocks.into_service();
        let dto = svc
            .update_rule(1, 10, 100, "recycling goes out on Tuesdays")
            .await
            .unwrap();

        assert_eq!(dto.content, "recycling goes out on Tuesdays");
    }

    #[tokio::test]
    async fn test_update_rejects_rule_from_another_house() {
        let mut mocks = Mocks::new();
        mocks
            .houses
            .expect_find_by_id()
            .returning(|id| Ok(Some(house(id))));
        mocks.assignments.expect_is_member().returning(|_, _| Ok(true));
        mocks
            .users
            .expect_find_by_id()
            .returning(|id| Ok(Some(resident(id, "Amy"))));
        mocks.rules.expect_find_by_id().returning(|id| {
            Ok(Some(Rule {
                id,
                house_id: 77,
                content: "keep the hallway clear".to_string(),
                ..Default::default()
            }))
        });

        let svc = mocks.into_service();
        let result = svc.update_rule(1, 10, 100, "keep the hallway clear always").await;

        assert!(matches!(result, Err(RuleError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_announces_removed_wording() {
        let mut mocks = Mocks::new();
        mocks
            .houses
            .expect_find_by_id()
            .returning(|id| Ok(Some(house(id))));
        mocks.assignments.expect_is_member().returning(|_, _| Ok(true));
        mocks
            .users
            .expect_find_by_id()
            .returning(|id| Ok(Some(resident(id, "Terry"))));
        mocks.rules.expect_find_by_id().returning(|id| {
            Ok(Some(Rule {
                id,
                house_id: 10,
                content: "no yogurt before noon".to_string(),
                ..Default::default()
            }))
        });
        mocks.rules.expect_delete().times(1).returning(|_| Ok(()));
        mocks
            .notifications
            .expect_deliver_to_house()
            .withf(|n: &Notification| n.alert == "Terry has deleted no yogurt before noon.")
            .times(1)
            .returning(|n| Ok(delivered(n)));

        let svc = mocks.into_service();
        tokio_test::assert_ok!(svc.delete_rule(1, 10, 100).await);
    }

    #[tokio::test]
    async fn test_delete_missing_rule_is_not_found() {
        let mut mocks = Mocks::new();
        mocks
            .houses
            .expect_find_by_id()
            .returning(|id| Ok(Some(house(id))));
        mocks.assignments.expect_is_member().returning(|_, _| Ok(true));
        mocks
            .users
            .expect_find_by_id()
            .returning(|id| Ok(Some(resident(id, "Terry"))));
        mocks.rules.expect_find_by_id().returning(|_| Ok(None));

        let svc = mocks.into_service();
        let result = svc.delete_rule(1, 10, 100).await;

        assert!(matches!(result, Err(RuleError::NotFound)));
    }
}
