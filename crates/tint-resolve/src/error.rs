//! Semantic errors reported by the resolver.
//!
//! The `Display` text of each variant is the message of the diagnostic the
//! resolver attaches to the offending node.

fn few_or_many(found: &usize, expected: &usize) -> &'static str {
    if found < expected { "few" } else { "many" }
}

/// A semantic error found while resolving a program.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    // Identifiers and declarations.
    #[error("identifier must be declared before use: {0}")]
    UndeclaredIdentifier(String),

    #[error("redeclared identifier '{0}'")]
    Redeclared(String),

    #[error("missing '(' for function call: {0}")]
    FunctionUsedAsValue(String),

    #[error("variable '{0}' cannot have void type")]
    VoidVariable(String),

    #[error("let declaration '{0}' must have an initializer")]
    ConstWithoutInitializer(String),

    #[error("variable '{name}' of type '{expected}' cannot be initialized with a value of type '{found}'")]
    InitializerMismatch {
        name: String,
        expected: String,
        found: String,
    },

    #[error("module-scope variable '{0}' must have a storage class")]
    MissingStorageClass(String),

    #[error("function-scope variable '{0}' must have function storage class")]
    FunctionScopeStorageClass(String),

    #[error("decoration {decoration} is not valid for {context}")]
    InvalidDecoration {
        decoration: String,
        context: String,
    },

    #[error("variable '{name}' in {storage_class} storage must have a host-shareable type, found '{ty}'")]
    NotHostShareable {
        name: String,
        storage_class: String,
        ty: String,
    },

    // Expressions.
    #[error("unable to find called function: {0}")]
    UnknownFunction(String),

    #[error("entry point '{0}' cannot be called")]
    CalledEntryPoint(String),

    #[error("too {} arguments in call to '{name}', expected {expected}, got {found}", few_or_many(.found, .expected))]
    ArgumentCount {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("type mismatch for argument {index} in call to '{name}', expected '{expected}', got '{found}'")]
    ArgumentType {
        name: String,
        index: usize,
        expected: String,
        found: String,
    },

    #[error("no matching call to {name}({args})")]
    NoMatchingIntrinsic { name: String, args: String },

    #[error("struct member {member} not found in '{ty}'")]
    UnknownMember { member: String, ty: String },

    #[error("invalid vector swizzle member: {0}")]
    InvalidSwizzle(String),

    #[error("invalid use of member accessor on a non-struct/non-vector type: {0}")]
    InvalidMemberAccess(String),

    #[error("invalid parent type ({0}) in array accessor")]
    InvalidArrayAccess(String),

    #[error("array index must be an integer scalar, found '{0}'")]
    IndexNotInteger(String),

    #[error("binary '{op}' cannot be applied to '{lhs}' and '{rhs}'")]
    BinaryOperands {
        op: String,
        lhs: String,
        rhs: String,
    },

    #[error("unary '{op}' cannot be applied to '{ty}'")]
    UnaryOperand { op: String, ty: String },

    #[error("cannot bitcast from '{from}' to '{to}'")]
    InvalidBitcast { from: String, to: String },

    #[error("invalid arguments for type constructor of '{0}'")]
    ConstructorArguments(String),

    // Statements.
    #[error("{construct} condition must be bool, found '{found}'")]
    ConditionNotBool {
        construct: &'static str,
        found: String,
    },

    #[error("break statement must be in a loop or switch case")]
    BreakOutsideLoopOrSwitch,

    #[error("continue statement must be in a loop")]
    ContinueOutsideLoop,

    #[error("continue statement must not be in a continuing block")]
    ContinueInContinuing,

    #[error("fallthrough statement must be in a switch case")]
    FallthroughOutsideCase,

    #[error("return statement type must match its function return type, returned '{found}', expected '{expected}'")]
    ReturnTypeMismatch { expected: String, found: String },

    #[error("non-void function '{0}' must end with a return statement")]
    MissingReturn(String),

    #[error("invalid assignment: left-hand side does not reference storage, found '{0}'")]
    AssignToValue(String),

    #[error("cannot assign to const '{0}'")]
    AssignToConst(String),

    #[error("invalid assignment: can't assign value of type '{rhs}' to '{lhs}'")]
    AssignmentMismatch { lhs: String, rhs: String },

    #[error("code is unreachable")]
    Unreachable,

    // Switch.
    #[error("switch statement selector expression must be of a scalar integer type")]
    SwitchSelectorNotInteger,

    #[error("the case selector values must have the same type as the selector expression")]
    SwitchSelectorTypeMismatch,

    #[error("a literal value must not appear more than once in the case selectors for a switch statement: '{0}'")]
    SwitchDuplicateSelector(String),

    #[error("switch statement must have at most one default clause")]
    SwitchMultipleDefaults,

    #[error("switch statement default case must be last")]
    SwitchDefaultNotLast,

    #[error("a fallthrough statement must not appear as the last statement in last clause of a switch")]
    SwitchFallthroughInLastCase,

    // Functions and entry points.
    #[error("recursion is not allowed: {0}")]
    Recursion(String),

    #[error("entry point '{0}' must return void")]
    EntryPointReturnType(String),

    #[error("function '{0}' must have at most one stage decoration")]
    MultipleStages(String),

    #[error("the workgroup_size decoration is only valid for compute stages")]
    WorkgroupSizeNotCompute,

    #[error("workgroup_size arguments must be greater than 0")]
    WorkgroupSizeZero,
}
