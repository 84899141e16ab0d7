// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrCode {
    /// No function or block to insert into
    CON1000     = 1000,

    /// Operand handle is absent or was erased
    CON1001     = 1001,

    /// Symbol already defined
    CON1002     = 1002,

    /// Block still has predecessors
    CON1003     = 1003,

    /// Write through an immutable value
    CON1004     = 1004,

    /// Argument length does not match
    CON1005     = 1005,

    /// Unknown intrinsic name
    CON1006     = 1006,

    /// Block already ends in a terminator
    CON1007     = 1007,

    /// Operand cannot be used in this position
    CON1008     = 1008,

    /// Malformed resource location
    CON1009     = 1009,

    /// Scope stack is empty
    CON1010     = 1010,

    /// Operand result kind cannot be lowered
    LOW2000     = 2000,

    /// Switch case is not a literal
    LOW2001     = 2001,

    /// Two procedures share one location
    LOW2002     = 2002,

    /// Received reference path cannot be moved into a deeper frame
    LOW2003     = 2003,

    /// Variable not found
    UNR3000     = 3000,

    /// Function not found
    UNR3001     = 3001,

    /// Block not found
    UNR3002     = 3002,
}
