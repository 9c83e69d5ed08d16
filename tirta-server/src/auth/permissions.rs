//! Permission Definitions
//!
//! Simplified RBAC permission system.
//!
//! ## 设计原则
//! - 读操作无需单独授权，登录即可查询所有工单数据
//! - 写操作按业务模块授权，由角色静态决定
//! - 账号管理仅 admin 角色可用

/// 投诉登记/更新 (HUMAS 前台)
pub const COMPLAINTS_MANAGE: &str = "complaints:manage";
/// 服务申请单管理
pub const SERVICE_REQUESTS_MANAGE: &str = "service_requests:manage";
/// 工作指令单管理 (Distribusi 技术员)
pub const WORK_ORDERS_MANAGE: &str = "work_orders:manage";
/// 维修报告管理
pub const REPAIR_REPORTS_MANAGE: &str = "repair_reports:manage";
/// 员工账号管理 (仅 admin)
pub const EMPLOYEES_MANAGE: &str = "employees:manage";

/// HUMAS 前台默认权限
pub const HUMAS_PERMISSIONS: &[&str] = &[COMPLAINTS_MANAGE, SERVICE_REQUESTS_MANAGE];

/// Distribusi 技术员默认权限
pub const DISTRIBUSI_PERMISSIONS: &[&str] = &[
    SERVICE_REQUESTS_MANAGE,
    WORK_ORDERS_MANAGE,
    REPAIR_REPORTS_MANAGE,
];

/// 角色 → 权限集合
///
/// admin 返回 `["all"]`，在检查处短路。
pub fn permissions_for_role(role: &str) -> &'static [&'static str] {
    match role {
        "admin" => &["all"],
        "humas" => HUMAS_PERMISSIONS,
        "distribusi" => DISTRIBUSI_PERMISSIONS,
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_has_all() {
        assert_eq!(permissions_for_role("admin"), &["all"]);
    }

    #[test]
    fn humas_cannot_manage_work_orders() {
        assert!(!permissions_for_role("humas").contains(&WORK_ORDERS_MANAGE));
        assert!(permissions_for_role("humas").contains(&COMPLAINTS_MANAGE));
    }

    #[test]
    fn unknown_role_has_nothing() {
        assert!(permissions_for_role("intern").is_empty());
    }
}
