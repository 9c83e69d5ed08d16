//! Current User Extractor
//!
//! 从请求扩展中提取认证后的用户上下文

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::{Claims, JwtService, permissions};
use crate::core::ServerState;
use crate::utils::AppError;

/// 当前登录用户
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub role: String,
}

impl CurrentUser {
    /// 是否拥有指定权限
    pub fn has_permission(&self, permission: &str) -> bool {
        let perms = permissions::permissions_for_role(&self.role);
        perms.contains(&"all") || perms.contains(&permission)
    }

    /// 要求指定权限，否则返回 403
    pub fn require(&self, permission: &str) -> Result<(), AppError> {
        if self.has_permission(permission) {
            Ok(())
        } else {
            Err(AppError::forbidden(format!(
                "Role '{}' lacks permission '{}'",
                self.role, permission
            )))
        }
    }

    /// 要求 admin 角色
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.role == "admin" {
            Ok(())
        } else {
            Err(AppError::forbidden("Admin role required"))
        }
    }
}

impl TryFrom<Claims> for CurrentUser {
    type Error = std::num::ParseIntError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        Ok(Self {
            id: claims.sub.parse()?,
            username: claims.username,
            display_name: claims.display_name,
            role: claims.role,
        })
    }
}

/// 受保护的 handler 可以直接声明 `user: CurrentUser` 参数。
/// 正常情况下中间件已经注入，extractor 直接复用；
/// 中间件未覆盖的路径则在这里完成验证。
impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Check if already extracted (from middleware)
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let auth_header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let token = match auth_header {
            Some(header) => JwtService::extract_from_header(header)
                .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
            None => return Err(AppError::unauthorized()),
        };

        let jwt_service = state.get_jwt_service();
        match jwt_service.validate_token(token) {
            Ok(claims) => {
                let user = CurrentUser::try_from(claims)
                    .map_err(|e| AppError::invalid_token(format!("Malformed JWT claims: {}", e)))?;
                parts.extensions.insert(user.clone());
                Ok(user)
            }
            Err(crate::auth::JwtError::ExpiredToken) => Err(AppError::token_expired()),
            Err(_) => Err(AppError::invalid_token("Invalid token")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: &str) -> CurrentUser {
        CurrentUser {
            id: 1,
            username: "u".to_string(),
            display_name: "U".to_string(),
            role: role.to_string(),
        }
    }

    #[test]
    fn admin_passes_every_check() {
        let u = user("admin");
        assert!(u.require(permissions::COMPLAINTS_MANAGE).is_ok());
        assert!(u.require(permissions::EMPLOYEES_MANAGE).is_ok());
        assert!(u.require_admin().is_ok());
    }

    #[test]
    fn humas_is_denied_work_orders() {
        let u = user("humas");
        assert!(u.require(permissions::COMPLAINTS_MANAGE).is_ok());
        assert!(u.require(permissions::WORK_ORDERS_MANAGE).is_err());
        assert!(u.require_admin().is_err());
    }
}
