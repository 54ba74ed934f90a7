//! The untyped syntax tree produced by the parser.

use std::fmt::{self, Display};

use crate::syn::token::Span;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum PrefixOperator {
	/// `-`
	Negate,
	/// `+`
	Positive,
	/// `not`, `!`
	Not,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum BinaryOperator {
	Or,
	And,

	Equal,
	NotEqual,
	LessThan,
	LessThanEqual,
	MoreThan,
	MoreThanEqual,
	In,
	NotIn,
	Like,

	Add,
	Subtract,
	Multiply,
	Divide,
	Modulo,
	Power,
}

impl BinaryOperator {
	pub fn is_comparison(self) -> bool {
		matches!(
			self,
			Self::Equal
				| Self::NotEqual
				| Self::LessThan
				| Self::LessThanEqual
				| Self::MoreThan
				| Self::MoreThanEqual
		)
	}

	pub fn is_arithmetic(self) -> bool {
		matches!(
			self,
			Self::Add | Self::Subtract | Self::Multiply | Self::Divide | Self::Modulo | Self::Power
		)
	}
}

impl Display for BinaryOperator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Or => "or",
			Self::And => "and",
			Self::Equal => "==",
			Self::NotEqual => "!=",
			Self::LessThan => "<",
			Self::LessThanEqual => "<=",
			Self::MoreThan => ">",
			Self::MoreThanEqual => ">=",
			Self::In => "in",
			Self::NotIn => "not in",
			Self::Like => "like",
			Self::Add => "+",
			Self::Subtract => "-",
			Self::Multiply => "*",
			Self::Divide => "/",
			Self::Modulo => "%",
			Self::Power => "**",
		})
	}
}

/// The binding power of an operator.
///
/// Binding power is the opposite of precedence: a higher binding power means
/// that an operator holds on to its neighbours more tightly.
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub enum BindingPower {
	Base,
	Or,
	And,
	Relation,
	AddSub,
	MulDiv,
	Power,
	Prefix,
	Postfix,
}

impl BindingPower {
	pub fn for_binary_operator(op: BinaryOperator) -> Self {
		match op {
			BinaryOperator::Or => Self::Or,
			BinaryOperator::And => Self::And,
			BinaryOperator::Equal
			| BinaryOperator::NotEqual
			| BinaryOperator::LessThan
			| BinaryOperator::LessThanEqual
			| BinaryOperator::MoreThan
			| BinaryOperator::MoreThanEqual
			| BinaryOperator::In
			| BinaryOperator::NotIn
			| BinaryOperator::Like => Self::Relation,
			BinaryOperator::Add | BinaryOperator::Subtract => Self::AddSub,
			BinaryOperator::Multiply | BinaryOperator::Divide | BinaryOperator::Modulo => {
				Self::MulDiv
			}
			BinaryOperator::Power => Self::Power,
		}
	}
}

/// A node of the syntax tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Ast {
	Identifier(String),
	/// `base[index]`
	Index {
		base: Box<Ast>,
		index: Box<Ast>,
	},
	Bool(bool),
	Integer(i64),
	Float(f64),
	Strand(String),
	Array(Vec<Ast>),
	/// `{name}`, a value supplied when the plan is created.
	Template(String),
	Prefix {
		op: PrefixOperator,
		expr: Box<Ast>,
	},
	Binary {
		left: Box<Ast>,
		op: BinaryOperator,
		right: Box<Ast>,
	},
	/// `lower op column op upper` where both operators point the same way.
	Range {
		lower: Box<Ast>,
		lower_op: BinaryOperator,
		column: Box<Ast>,
		upper_op: BinaryOperator,
		upper: Box<Ast>,
	},
	/// `expr is null`, `expr is not null`
	Null {
		expr: Box<Ast>,
		negated: bool,
	},
	Exists(Box<Ast>),
	Call {
		name: String,
		args: Vec<Ast>,
		span: Span,
	},
}

/// A consumer of syntax trees.
pub trait AstVisitor {
	type Output;

	fn visit(&mut self, ast: &Ast) -> Self::Output;
}

impl Ast {
	pub fn accept<V: AstVisitor>(&self, visitor: &mut V) -> V::Output {
		visitor.visit(self)
	}
}
