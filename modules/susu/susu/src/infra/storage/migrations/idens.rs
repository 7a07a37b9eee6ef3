use sea_orm_migration::prelude::*;

#[derive(DeriveIden, Clone, Copy)]
pub(super) enum Users {
    Table,
    Id,
    FullName,
    PhoneNumber,
    Email,
    Username,
    Role,
    IsActive,
    ActiveBusinessId,
}

#[derive(DeriveIden, Clone, Copy)]
pub(super) enum Businesses {
    Table,
    Id,
    Name,
    AgentId,
    Location,
    Address,
    UniqueCode,
    IsDefault,
}

#[derive(DeriveIden, Clone, Copy)]
pub(super) enum UserBusiness {
    Table,
    UserId,
    BusinessId,
}

#[derive(DeriveIden, Clone, Copy)]
pub(super) enum UserSettings {
    Table,
    Id,
    UserId,
    NotificationMethod,
}

#[derive(DeriveIden, Clone, Copy)]
pub(super) enum Units {
    Table,
    Id,
    BusinessId,
    Name,
    Location,
}

#[derive(DeriveIden, Clone, Copy)]
pub(super) enum SavingsAccounts {
    Table,
    Id,
    CustomerId,
    BusinessId,
    UnitId,
    TrackingNumber,
    SavingsType,
    DailyAmount,
    DurationMonths,
    StartDate,
    EndDate,
    CommissionDays,
    CommissionAmount,
    TargetAmount,
    Status,
}

#[derive(DeriveIden, Clone, Copy)]
pub(super) enum SavingsMarkings {
    Table,
    Id,
    SavingsAccountId,
    UnitId,
    MarkedDate,
    Amount,
    Status,
    PaymentMethod,
    PaymentReference,
    MarkedById,
}

#[derive(DeriveIden, Clone, Copy)]
pub(super) enum Commissions {
    Table,
    Id,
    SavingsAccountId,
    AgentId,
    Amount,
    CommissionDate,
}

/// Audit columns shared by every audited table.
#[derive(DeriveIden, Clone, Copy)]
pub(super) enum Audit {
    CreatedBy,
    CreatedAt,
    UpdatedBy,
    UpdatedAt,
}
