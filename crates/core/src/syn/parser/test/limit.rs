use super::{binary, ident, parse, parse_with};
use crate::syn::ast::{Ast, BinaryOperator};
use crate::syn::parser::Parser;

fn height(ast: &Ast) -> usize {
	match ast {
		Ast::Binary {
			left,
			right,
			..
		} => 1 + height(left).max(height(right)),
		Ast::Index {
			base,
			index,
		} => 1 + height(base).max(height(index)),
		_ => 0,
	}
}

#[test]
fn expression_depth() {
	parse_with(Parser::with_depth_limit(5), "((((a))))")
		.expect("depth limit of 5 couldn't parse 4 nested parentheses");
	parse_with(Parser::with_depth_limit(5), "(((((a)))))")
		.expect_err("depth limit of 5 didn't trigger on 5 nested parentheses");
}

#[test]
fn prefix_depth() {
	parse_with(Parser::with_depth_limit(4), "not not not a")
		.expect("depth limit of 4 couldn't parse 3 prefix operators");
	parse_with(Parser::with_depth_limit(4), "not not not not a")
		.expect_err("depth limit of 4 didn't trigger on 4 prefix operators");
}

#[test]
fn deep_input_is_rejected_not_overflowed() {
	let source = format!("{}a{}", "(".repeat(10_000), ")".repeat(10_000));
	let error = parse_with(Parser::with_depth_limit(64), &source).unwrap_err();
	assert!(error.contains("Exceeded the maximum expression depth of 64"), "{error}");
}

#[test]
fn long_flat_expressions_are_not_limited() {
	let source = vec!["a == 1"; 500].join(" or ");
	parse(&source).expect("flat conjunctions should not count against the depth limit");
}

#[test]
fn logical_chains_are_balanced() {
	let source = vec!["a == 1"; 20_000].join(" or ");
	let ast = parse(&source).unwrap();
	// 15 levels of `or` above the comparisons.
	assert_eq!(height(&ast), 16);

	let source = vec!["a"; 10_000].join(" and ");
	let ast = parse_with(Parser::with_depth_limit(16), &source).unwrap();
	assert_eq!(height(&ast), 14);
}

#[test]
fn short_logical_chains_lean_left() {
	assert_eq!(
		parse("a or b or c").unwrap(),
		binary(binary(ident("a"), BinaryOperator::Or, ident("b")), BinaryOperator::Or, ident("c"))
	);
	assert_eq!(
		parse("a and b and c and d").unwrap(),
		binary(
			binary(ident("a"), BinaryOperator::And, ident("b")),
			BinaryOperator::And,
			binary(ident("c"), BinaryOperator::And, ident("d")),
		)
	);
	assert_eq!(
		parse("a and b or c and d or e").unwrap(),
		binary(
			binary(
				binary(ident("a"), BinaryOperator::And, ident("b")),
				BinaryOperator::Or,
				binary(ident("c"), BinaryOperator::And, ident("d")),
			),
			BinaryOperator::Or,
			ident("e"),
		)
	);
}

#[test]
fn arithmetic_chains_count_against_the_limit() {
	parse_with(Parser::with_depth_limit(4), "a + 1 + 2").expect("depth limit of 4 couldn't parse 2 additions");
	parse_with(Parser::with_depth_limit(4), "a + 1 + 2 + 3")
		.expect_err("depth limit of 4 didn't trigger on 3 additions");

	let source = format!("a{} == 3", " + 1".repeat(10_000));
	let error = parse(&source).unwrap_err();
	assert!(error.contains("Exceeded the maximum expression depth of 256"), "{error}");
}

#[test]
fn index_chains_count_against_the_limit() {
	let source = format!("a{}", "[0]".repeat(10_000));
	let error = parse(&source).unwrap_err();
	assert!(error.contains("Exceeded the maximum expression depth"), "{error}");
	let source = format!("-1{}", "[0]".repeat(10_000));
	let error = parse(&source).unwrap_err();
	assert!(error.contains("Exceeded the maximum expression depth"), "{error}");
}
