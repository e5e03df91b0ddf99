use serde::Serialize;

use crate::operations::{DomainError, Operation};

/// 已持久化的计算记录（对应 calculations 表的一行）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculationRecord {
    pub id: i64,
    pub operation: Operation,
    pub num1: f64,
    pub num2: f64,
    pub result: f64,
}

/// 待写入的计算：只能由一次成功的运算得到，保证 result 与 operation/num1/num2 一致，
/// 且三者均为有限值（SQLite 会把 NaN 存为 NULL，JSON 也无法表示 inf）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewCalculation {
    operation: Operation,
    num1: f64,
    num2: f64,
    result: f64,
}

impl NewCalculation {
    pub fn compute(operation: Operation, num1: f64, num2: f64) -> Result<Self, DomainError> {
        if !num1.is_finite() || !num2.is_finite() {
            return Err(DomainError::NonFiniteOperand);
        }
        let result = operation.apply(num1, num2)?;
        if !result.is_finite() {
            return Err(DomainError::NonFiniteResult);
        }
        Ok(Self {
            operation,
            num1,
            num2,
            result,
        })
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn num1(&self) -> f64 {
        self.num1
    }

    pub fn num2(&self) -> f64 {
        self.num2
    }

    pub fn result(&self) -> f64 {
        self.result
    }

    /// 存储分配 id 后转为完整记录
    pub fn into_record(self, id: i64) -> CalculationRecord {
        CalculationRecord {
            id,
            operation: self.operation,
            num1: self.num1,
            num2: self.num2,
            result: self.result,
        }
    }
}
