//! Access
//!
//! Role-based access to portal resources. Each [`Role`] maps to a fixed set of
//! [`Capabilities`]; callers ask [`can_access`] (or [`Session::can_access`]) instead of
//! branching on role names themselves.

use std::{fmt, str::FromStr};

use serde::Deserialize;
use smallvec::SmallVec;
use thiserror::Error;

/// Errors related to roles and sessions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccessError {
    /// Role name not recognised.
    #[error("unknown role: {0}")]
    UnknownRole(String),
}

/// Which half of the portal a resource or role belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Portal {
    /// Staff console.
    Admin,

    /// Client self-service portal.
    Client,
}

impl Portal {
    /// Landing route.
    pub fn home_path(self) -> &'static str {
        match self {
            Self::Admin => "/admin",
            Self::Client => "/portal",
        }
    }
}

/// A page or area of the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// Staff dashboard
    Dashboard,
    /// Order management
    Orders,
    /// Stock and product management
    Inventory,
    /// Client accounts and pricing
    Clients,
    /// Invoicing and payments
    Finance,
    /// Returns and repairs
    Rma,
    /// Reporting
    Reports,
    /// Quality control
    QualityControl,
    /// System settings
    Settings,
    /// Client dashboard
    PortalDashboard,
    /// Product catalog
    Catalog,
    /// Client order history
    OrderHistory,
    /// Client invoices
    Invoices,
    /// Client payments
    Payments,
    /// Client account settings
    Account,
    /// Client support
    Support,
}

impl Resource {
    /// Every resource, in navigation order.
    pub const ALL: [Self; 16] = [
        Self::Dashboard,
        Self::Orders,
        Self::Inventory,
        Self::Clients,
        Self::Finance,
        Self::Rma,
        Self::Reports,
        Self::QualityControl,
        Self::Settings,
        Self::PortalDashboard,
        Self::Catalog,
        Self::OrderHistory,
        Self::Invoices,
        Self::Payments,
        Self::Account,
        Self::Support,
    ];

    /// Navigation label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Dashboard | Self::PortalDashboard => "Dashboard",
            Self::Orders => "Orders",
            Self::Inventory => "Inventory",
            Self::Clients => "Clients",
            Self::Finance => "Finance",
            Self::Rma => "RMA & Repairs",
            Self::Reports => "Reports",
            Self::QualityControl => "Quality Control",
            Self::Settings => "Settings",
            Self::Catalog => "Product Catalog",
            Self::OrderHistory => "Order History",
            Self::Invoices => "Invoices",
            Self::Payments => "Payment Center",
            Self::Account => "Account Settings",
            Self::Support => "Support",
        }
    }

    /// Route path.
    pub fn path(self) -> &'static str {
        match self {
            Self::Dashboard => "/admin",
            Self::Orders => "/admin/orders",
            Self::Inventory => "/admin/inventory",
            Self::Clients => "/admin/clients",
            Self::Finance => "/admin/finance",
            Self::Rma => "/admin/rma",
            Self::Reports => "/admin/reports",
            Self::QualityControl => "/admin/quality",
            Self::Settings => "/admin/settings",
            Self::PortalDashboard => "/portal",
            Self::Catalog => "/portal/catalog",
            Self::OrderHistory => "/portal/orders",
            Self::Invoices => "/portal/invoices",
            Self::Payments => "/portal/payments",
            Self::Account => "/portal/account",
            Self::Support => "/portal/support",
        }
    }

    /// Portal the resource lives in.
    pub fn portal(self) -> Portal {
        match self {
            Self::Dashboard
            | Self::Orders
            | Self::Inventory
            | Self::Clients
            | Self::Finance
            | Self::Rma
            | Self::Reports
            | Self::QualityControl
            | Self::Settings => Portal::Admin,
            Self::PortalDashboard
            | Self::Catalog
            | Self::OrderHistory
            | Self::Invoices
            | Self::Payments
            | Self::Account
            | Self::Support => Portal::Client,
        }
    }

    const fn bit(self) -> u32 {
        1 << self as u32
    }
}

/// A set of resources, one bit per [`Resource`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Capabilities(u32);

impl Capabilities {
    /// The empty set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Build a set from a list of resources.
    pub const fn of(mut resources: &[Resource]) -> Self {
        let mut bits = 0;

        while let [resource, rest @ ..] = resources {
            bits |= resource.bit();
            resources = rest;
        }

        Self(bits)
    }

    /// Add every resource in `other`.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Check membership.
    pub const fn contains(self, resource: Resource) -> bool {
        self.0 & resource.bit() != 0
    }

    /// Resources in the set, in navigation order.
    pub fn iter(self) -> impl Iterator<Item = Resource> {
        Resource::ALL
            .into_iter()
            .filter(move |resource| self.contains(*resource))
    }

    /// Number of resources in the set.
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Check if the set is empty.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

const STAFF: Capabilities = Capabilities::of(&[
    Resource::Dashboard,
    Resource::Orders,
    Resource::Inventory,
    Resource::Reports,
    Resource::QualityControl,
]);

const CLIENT: Capabilities = Capabilities::of(&[
    Resource::PortalDashboard,
    Resource::Catalog,
    Resource::OrderHistory,
    Resource::Invoices,
    Resource::Payments,
    Resource::Account,
    Resource::Support,
]);

/// User role, as issued by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access to the staff console.
    SuperAdmin,
    /// Sales staff; manages clients.
    SalesManager,
    /// Warehouse staff; handles returns.
    WarehouseStaff,
    /// Finance staff.
    Accountant,
    /// A wholesale customer.
    Client,
}

impl Role {
    /// Every role.
    pub const ALL: [Self; 5] = [
        Self::SuperAdmin,
        Self::SalesManager,
        Self::WarehouseStaff,
        Self::Accountant,
        Self::Client,
    ];

    /// Resources this role may open.
    pub const fn capabilities(self) -> Capabilities {
        match self {
            Self::SuperAdmin => STAFF.union(Capabilities::of(&[
                Resource::Clients,
                Resource::Finance,
                Resource::Rma,
                Resource::Settings,
            ])),
            Self::SalesManager => STAFF.union(Capabilities::of(&[Resource::Clients])),
            Self::WarehouseStaff => STAFF.union(Capabilities::of(&[Resource::Rma])),
            Self::Accountant => STAFF.union(Capabilities::of(&[Resource::Finance])),
            Self::Client => CLIENT,
        }
    }

    /// Portal the role signs in to.
    pub fn portal(self) -> Portal {
        match self {
            Self::Client => Portal::Client,
            Self::SuperAdmin | Self::SalesManager | Self::WarehouseStaff | Self::Accountant => {
                Portal::Admin
            }
        }
    }

    /// Snake-case identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::SalesManager => "sales_manager",
            Self::WarehouseStaff => "warehouse_staff",
            Self::Accountant => "accountant",
            Self::Client => "client",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::SuperAdmin => "Super Admin",
            Self::SalesManager => "Sales Manager",
            Self::WarehouseStaff => "Warehouse Staff",
            Self::Accountant => "Accountant",
            Self::Client => "Client",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| AccessError::UnknownRole(s.to_string()))
    }
}

/// Check whether `role` may open `resource`.
pub fn can_access(role: Role, resource: Resource) -> bool {
    role.capabilities().contains(resource)
}

/// Resources `role` may open, in navigation order.
pub fn navigation(role: Role) -> SmallVec<[Resource; 9]> {
    role.capabilities().iter().collect()
}

/// An authenticated user, passed explicitly to whatever needs identity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Session {
    /// Identity provider user id
    pub user_id: String,

    /// Sign-in email
    pub email: String,

    /// Display name, if set
    #[serde(default)]
    pub display_name: Option<String>,

    /// Role
    pub role: Role,

    /// Owning company, for client users
    #[serde(default)]
    pub company_id: Option<String>,
}

impl Session {
    /// Create a session with no display name or company.
    pub fn new(user_id: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            email: email.into(),
            display_name: None,
            role,
            company_id: None,
        }
    }

    /// Check whether this session may open `resource`.
    pub fn can_access(&self, resource: Resource) -> bool {
        can_access(self.role, resource)
    }

    /// Resources this session may open, in navigation order.
    pub fn navigation(&self) -> SmallVec<[Resource; 9]> {
        navigation(self.role)
    }

    /// Landing route for this session's role.
    pub fn home_path(&self) -> &'static str {
        self.role.portal().home_path()
    }

    /// Display name, falling back to email.
    pub fn display_name_or_email(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }

    /// Upper-case initials of the display name, or the first two letters of the email.
    pub fn initials(&self) -> String {
        match self.display_name.as_deref() {
            Some(name) => name
                .split_whitespace()
                .filter_map(|word| word.chars().next())
                .flat_map(char::to_uppercase)
                .collect(),
            None => self.email.chars().take(2).flat_map(char::to_uppercase).collect(),
        }
    }
}
