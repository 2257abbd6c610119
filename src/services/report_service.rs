// src/services/report_service.rs

use crate::{
    common::error::AppError,
    db::{EmployeeRepository, ReportRepository},
    models::{
        employee::{estimate_commissions, CommissionPeriod, EmployeeCommission, EmployeeFilter},
        report::{check_year, fill_months, DashboardSummary, GrowthReport, MonthlyRevenue, PaymentMethodBreakdown},
    },
};

#[derive(Clone)]
pub struct ReportService {
    repo: ReportRepository,
    employee_repo: EmployeeRepository,
}

impl ReportService {
    pub fn new(repo: ReportRepository, employee_repo: EmployeeRepository) -> Self {
        Self { repo, employee_repo }
    }

    pub async fn dashboard(&self) -> Result<DashboardSummary, AppError> {
        self.repo.dashboard_summary().await
    }

    pub async fn monthly_revenue(&self, year: i32) -> Result<Vec<MonthlyRevenue>, AppError> {
        let year = check_year(year)?;
        let rows = self.repo.monthly_revenue(year).await?;
        Ok(fill_months(rows))
    }

    pub async fn payment_methods(&self) -> Result<Vec<PaymentMethodBreakdown>, AppError> {
        self.repo.payment_methods().await
    }

    pub async fn growth(&self) -> Result<GrowthReport, AppError> {
        Ok(self.repo.month_comparison().await?.into())
    }

    /// Todos os funcionários (inclusive inativos com vendas no período).
    pub async fn commissions(&self, period: &CommissionPeriod) -> Result<Vec<EmployeeCommission>, AppError> {
        period.check()?;
        let employees = self.employee_repo.list(&EmployeeFilter::default()).await?;
        let lines = self.employee_repo.commission_lines(period.from, period.to).await?;
        Ok(estimate_commissions(&employees, &lines))
    }
}
