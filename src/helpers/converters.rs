//! Mapping between the persisted/engine types and the transport DTOs.

use common::{
    AutomaticTransactionDto, BatchOutcomeDto, BatchResultDto, CreateAutomaticTransactionRequest,
    DirectionDto, OccurrenceDto, RecalculationReportDto, RecurrenceTypeDto, RuleStatusDto,
    UpdateAutomaticTransactionRequest,
};
use model::entities::automatic_transaction::{self, Direction, RecurrenceType, RuleStatus};
use model::entities::transaction;
use scheduler::{BatchResult, NewRule, Outcome, RecalculationReport, RuleUpdate};

pub fn recurrence_type_to_dto(value: RecurrenceType) -> RecurrenceTypeDto {
    match value {
        RecurrenceType::Daily => RecurrenceTypeDto::Daily,
        RecurrenceType::Weekly => RecurrenceTypeDto::Weekly,
        RecurrenceType::Monthly => RecurrenceTypeDto::Monthly,
        RecurrenceType::Yearly => RecurrenceTypeDto::Yearly,
    }
}

pub fn recurrence_type_from_dto(value: RecurrenceTypeDto) -> RecurrenceType {
    match value {
        RecurrenceTypeDto::Daily => RecurrenceType::Daily,
        RecurrenceTypeDto::Weekly => RecurrenceType::Weekly,
        RecurrenceTypeDto::Monthly => RecurrenceType::Monthly,
        RecurrenceTypeDto::Yearly => RecurrenceType::Yearly,
    }
}

pub fn status_to_dto(value: RuleStatus) -> RuleStatusDto {
    match value {
        RuleStatus::Active => RuleStatusDto::Active,
        RuleStatus::Paused => RuleStatusDto::Paused,
        RuleStatus::Completed => RuleStatusDto::Completed,
        RuleStatus::Cancelled => RuleStatusDto::Cancelled,
    }
}

pub fn direction_to_dto(value: Direction) -> DirectionDto {
    match value {
        Direction::Income => DirectionDto::Income,
        Direction::Expense => DirectionDto::Expense,
    }
}

pub fn direction_from_dto(value: DirectionDto) -> Direction {
    match value {
        DirectionDto::Income => Direction::Income,
        DirectionDto::Expense => Direction::Expense,
    }
}

pub fn rule_to_dto(model: automatic_transaction::Model) -> AutomaticTransactionDto {
    AutomaticTransactionDto {
        id: model.id,
        owner_id: model.owner_id,
        amount: model.amount,
        currency: model.currency,
        description: model.description,
        category: model.category,
        subcategory: model.subcategory,
        notes: model.notes,
        is_mandatory: model.is_mandatory,
        direction: direction_to_dto(model.direction),
        recurrence_type: recurrence_type_to_dto(model.recurrence_type),
        recurrence_interval: model.recurrence_interval,
        day_of_month: model.day_of_month,
        day_of_week: model.day_of_week,
        start_date: model.start_date,
        end_date: model.end_date,
        next_execution_date: model.next_execution_date,
        status: status_to_dto(model.status),
        execution_count: model.execution_count,
        last_executed: model.last_executed,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

pub fn occurrence_to_dto(model: transaction::Model) -> OccurrenceDto {
    OccurrenceDto {
        id: model.id,
        automatic_transaction_id: model.automatic_transaction_id,
        owner_id: model.owner_id,
        amount: model.amount,
        currency: model.currency,
        direction: direction_to_dto(model.direction),
        category: model.category,
        subcategory: model.subcategory,
        description: model.description,
        notes: model.notes,
        is_mandatory: model.is_mandatory,
        is_automatic: model.is_automatic,
        date: model.date,
        created_at: model.created_at,
    }
}

pub fn outcome_to_dto(outcome: Outcome) -> BatchOutcomeDto {
    BatchOutcomeDto {
        automatic_transaction_id: outcome.rule_id,
        transaction_id: outcome.occurrence_id,
        transaction_date: outcome.occurrence_date,
        next_execution_date: outcome.next_execution_date,
        status: status_to_dto(outcome.status),
    }
}

pub fn batch_result_to_dto(result: BatchResult) -> BatchResultDto {
    BatchResultDto {
        processed_count: result.processed_count,
        errors: result.errors,
        outcomes: result.outcomes.into_iter().map(outcome_to_dto).collect(),
    }
}

pub fn report_to_dto(owner_id: String, report: RecalculationReport) -> RecalculationReportDto {
    RecalculationReportDto {
        owner_id,
        updated: report.updated,
        unchanged: report.unchanged,
        skipped: report.skipped,
        errors: report.errors,
    }
}

pub fn new_rule_from_request(request: CreateAutomaticTransactionRequest) -> NewRule {
    NewRule {
        owner_id: request.owner_id,
        amount: request.amount,
        currency: request.currency,
        description: request.description,
        category: request.category,
        subcategory: request.subcategory,
        notes: request.notes,
        is_mandatory: request.is_mandatory,
        direction: direction_from_dto(request.direction),
        recurrence_type: recurrence_type_from_dto(request.recurrence_type),
        recurrence_interval: request.recurrence_interval,
        day_of_month: request.day_of_month,
        day_of_week: request.day_of_week,
        start_date: request.start_date,
        end_date: request.end_date,
    }
}

pub fn rule_update_from_request(request: UpdateAutomaticTransactionRequest) -> RuleUpdate {
    RuleUpdate {
        amount: request.amount,
        currency: request.currency,
        description: request.description,
        category: request.category,
        subcategory: request.subcategory,
        notes: request.notes,
        is_mandatory: request.is_mandatory,
        direction: request.direction.map(direction_from_dto),
        recurrence_type: request.recurrence_type.map(recurrence_type_from_dto),
        recurrence_interval: request.recurrence_interval,
        day_of_month: request.day_of_month,
        day_of_week: request.day_of_week,
        start_date: request.start_date,
        end_date: request.end_date,
    }
}
