use tracing::instrument;

use crate::config::jwt::JwtConfig;
use crate::integrity;
use crate::modules::auth::model::{
    LoginDto, LoginResponse, PublicUser, SignupDto, SignupResponse, UserRole,
};
use crate::storage::{NewProfile, NewUser, Storage};
use crate::utils::errors::AppError;
use crate::utils::jwt::create_access_token;
use crate::utils::password::{hash_password, verify_password};

pub struct AuthService;

impl AuthService {
    /// Create a user and its role profile in one atomic write. Only
    /// student and teacher accounts may self-register.
    #[instrument(skip(storage, dto))]
    pub async fn signup(
        storage: &dyn Storage,
        dto: SignupDto,
    ) -> Result<SignupResponse, AppError> {
        let role = dto.role.unwrap_or(UserRole::Student);
        integrity::signup_role_allowed(role)?;
        integrity::email_unique(storage, &dto.email).await?;

        let profile = match role {
            UserRole::Student => NewProfile::Student {
                grade_id: None,
                class_id: None,
                parent_id: None,
            },
            UserRole::Teacher => NewProfile::Teacher {
                assignments: vec![],
            },
            // Rejected above.
            UserRole::Admin | UserRole::Parent => unreachable!(),
        };

        let (user, _) = storage
            .create_user_with_profile(
                NewUser {
                    name: dto.name,
                    email: dto.email,
                    password_hash: hash_password(&dto.password)?,
                    role,
                },
                profile,
            )
            .await?;

        Ok(SignupResponse {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
        })
    }

    /// Unknown email and wrong password get the same answer so the
    /// response does not leak which emails are registered.
    #[instrument(skip(storage, dto, jwt_config))]
    pub async fn login(
        storage: &dyn Storage,
        dto: LoginDto,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let user = storage
            .find_user_by_email(&dto.email)
            .await?
            .ok_or_else(|| AppError::unauthenticated("Invalid email or password"))?;

        if !verify_password(&dto.password, &user.password)? {
            return Err(AppError::unauthenticated("Invalid email or password"));
        }

        let access_token = create_access_token(user.id, &user.email, jwt_config)?;

        Ok(LoginResponse {
            access_token,
            user: PublicUser::from(user),
        })
    }
}
