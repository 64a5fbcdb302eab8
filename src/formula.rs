//! 저장된 데이터 계산식을 위한 제한된 수식 평가기.
//!
//! 숫자, 변수, 사칙연산, 비교, `and`/`or`/`not`, `a if 조건 else b`,
//! 그리고 `min`/`max`/`abs`/`round` 함수만 허용한다. 그 밖의 문법은 파싱 단계에서 거부된다.
//! 참/거짓은 1.0/0.0으로 표현하며 0이 아닌 값은 참으로 본다.

use std::collections::{BTreeSet, HashMap};

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 괄호, 함수 호출, 단항 연산자, 조건식의 최대 중첩 깊이
const MAX_NESTING: usize = 64;
/// 한 수식의 최대 토큰 수. 왼쪽으로 이어지는 연산 사슬의 평가 깊이를 제한한다.
const MAX_TOKENS: usize = 1024;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    #[error("허용되지 않는 문자 '{ch}' (위치 {pos})")]
    UnexpectedChar { ch: char, pos: usize },
    #[error("수식 문법 오류: {0}")]
    Syntax(String),
    #[error("허용되지 않는 함수: {0}")]
    UnknownFunction(String),
    #[error("{name}() 인자 개수가 맞지 않습니다 ({got}개)")]
    Arity { name: &'static str, got: usize },
    #[error("정의되지 않은 변수: {0}")]
    UnknownVariable(String),
    #[error("0으로 나눌 수 없습니다")]
    DivisionByZero,
    #[error("계산 결과가 유한한 숫자가 아닙니다")]
    NonFinite,
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    Comma,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

fn tokenize(src: &str) -> Result<Vec<Token>, FormulaError> {
    let chars: Vec<char> = src.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        if ch.is_whitespace() {
            i += 1;
            continue;
        }
        if ch.is_ascii_digit() || (ch == '.' && chars.get(i + 1).is_some_and(|c| c.is_ascii_digit())) {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                i += 1;
            }
            if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                let mut j = i + 1;
                if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                    j += 1;
                }
                if j < chars.len() && chars[j].is_ascii_digit() {
                    i = j;
                    while i < chars.len() && chars[i].is_ascii_digit() {
                        i += 1;
                    }
                }
            }
            let text: String = chars[start..i].iter().collect();
            let value = text
                .parse::<f64>()
                .map_err(|_| FormulaError::Syntax(format!("잘못된 숫자 '{text}'")))?;
            tokens.push(Token::Number(value));
            continue;
        }
        if ch.is_alphabetic() || ch == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            tokens.push(Token::Ident(chars[start..i].iter().collect()));
            continue;
        }

        let next = chars.get(i + 1).copied();
        let (token, width) = match (ch, next) {
            ('<', Some('=')) => (Token::Le, 2),
            ('>', Some('=')) => (Token::Ge, 2),
            ('=', Some('=')) => (Token::Eq, 2),
            ('!', Some('=')) => (Token::Ne, 2),
            ('<', _) => (Token::Lt, 1),
            ('>', _) => (Token::Gt, 1),
            ('+', _) => (Token::Plus, 1),
            ('-', _) => (Token::Minus, 1),
            ('*', _) => (Token::Star, 1),
            ('/', _) => (Token::Slash, 1),
            ('(', _) => (Token::LParen, 1),
            (')', _) => (Token::RParen, 1),
            (',', _) => (Token::Comma, 1),
            _ => return Err(FormulaError::UnexpectedChar { ch, pos: i }),
        };
        tokens.push(token);
        i += width;
    }
    Ok(tokens)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CmpOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl CmpOp {
    fn apply(self, a: f64, b: f64) -> bool {
        match self {
            CmpOp::Lt => a < b,
            CmpOp::Le => a <= b,
            CmpOp::Gt => a > b,
            CmpOp::Ge => a >= b,
            CmpOp::Eq => a == b,
            CmpOp::Ne => a != b,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Func {
    Min,
    Max,
    Abs,
    Round,
}

impl Func {
    fn lookup(name: &str) -> Option<Self> {
        match name {
            "min" => Some(Func::Min),
            "max" => Some(Func::Max),
            "abs" => Some(Func::Abs),
            "round" => Some(Func::Round),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Func::Min => "min",
            Func::Max => "max",
            Func::Abs => "abs",
            Func::Round => "round",
        }
    }

    fn check_arity(self, got: usize) -> Result<(), FormulaError> {
        let ok = match self {
            Func::Min | Func::Max => got >= 1,
            Func::Abs => got == 1,
            Func::Round => got == 1 || got == 2,
        };
        if ok {
            Ok(())
        } else {
            Err(FormulaError::Arity {
                name: self.name(),
                got,
            })
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Number(f64),
    Var(String),
    Neg(Box<Expr>),
    Not(Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    /// `a < b <= c` 처럼 이어진 비교
    Compare(Box<Expr>, Vec<(CmpOp, Expr)>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    /// (참일 때, 조건, 거짓일 때)
    IfElse(Box<Expr>, Box<Expr>, Box<Expr>),
    Call(Func, Vec<Expr>),
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    /// 한 단계 더 중첩해 `f`를 파싱한다. 한도를 넘으면 문법 오류.
    fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, FormulaError>,
    ) -> Result<T, FormulaError> {
        if self.depth >= MAX_NESTING {
            return Err(FormulaError::Syntax(format!(
                "중첩이 {MAX_NESTING}단계를 넘습니다"
            )));
        }
        self.depth += 1;
        let parsed = f(self);
        self.depth -= 1;
        parsed
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        matches!(self.peek(), Some(Token::Ident(name)) if name == keyword)
    }

    fn expect(&mut self, expected: Token) -> Result<(), FormulaError> {
        match self.next() {
            Some(token) if token == expected => Ok(()),
            other => Err(FormulaError::Syntax(format!(
                "{expected:?}가 필요하지만 {other:?}를 만났습니다"
            ))),
        }
    }

    fn ternary(&mut self) -> Result<Expr, FormulaError> {
        let then = self.or_expr()?;
        if !self.at_keyword("if") {
            return Ok(then);
        }
        self.pos += 1;
        let cond = self.or_expr()?;
        if !self.at_keyword("else") {
            return Err(FormulaError::Syntax("'if' 뒤에 'else'가 없습니다".into()));
        }
        self.pos += 1;
        let otherwise = self.nested(Self::ternary)?;
        Ok(Expr::IfElse(Box::new(then), Box::new(cond), Box::new(otherwise)))
    }

    fn or_expr(&mut self) -> Result<Expr, FormulaError> {
        let mut lhs = self.and_expr()?;
        while self.at_keyword("or") {
            self.pos += 1;
            let rhs = self.and_expr()?;
            lhs = Expr::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn and_expr(&mut self) -> Result<Expr, FormulaError> {
        let mut lhs = self.not_expr()?;
        while self.at_keyword("and") {
            self.pos += 1;
            let rhs = self.not_expr()?;
            lhs = Expr::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn not_expr(&mut self) -> Result<Expr, FormulaError> {
        if self.at_keyword("not") {
            self.pos += 1;
            let inner = self.nested(Self::not_expr)?;
            return Ok(Expr::Not(Box::new(inner)));
        }
        self.comparison()
    }

    fn comparison(&mut self) -> Result<Expr, FormulaError> {
        let first = self.additive()?;
        let mut rest = Vec::new();
        loop {
            let op = match self.peek() {
                Some(Token::Lt) => CmpOp::Lt,
                Some(Token::Le) => CmpOp::Le,
                Some(Token::Gt) => CmpOp::Gt,
                Some(Token::Ge) => CmpOp::Ge,
                Some(Token::Eq) => CmpOp::Eq,
                Some(Token::Ne) => CmpOp::Ne,
                _ => break,
            };
            self.pos += 1;
            rest.push((op, self.additive()?));
        }
        if rest.is_empty() {
            Ok(first)
        } else {
            Ok(Expr::Compare(Box::new(first), rest))
        }
    }

    fn additive(&mut self) -> Result<Expr, FormulaError> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.term()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Expr, FormulaError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinOp::Mul,
                Some(Token::Slash) => BinOp::Div,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, FormulaError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                Ok(Expr::Neg(Box::new(self.nested(Self::unary)?)))
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.nested(Self::unary)
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<Expr, FormulaError> {
        match self.next() {
            Some(Token::Number(v)) => Ok(Expr::Number(v)),
            Some(Token::LParen) => {
                let inner = self.nested(Self::ternary)?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Some(Token::Ident(name)) => {
                if matches!(name.as_str(), "if" | "else" | "and" | "or" | "not") {
                    return Err(FormulaError::Syntax(format!("예약어 '{name}'의 위치가 잘못되었습니다")));
                }
                if self.peek() != Some(&Token::LParen) {
                    return Ok(Expr::Var(name));
                }
                let func = Func::lookup(&name).ok_or(FormulaError::UnknownFunction(name))?;
                self.pos += 1;
                let args = self.nested(Self::arguments)?;
                self.expect(Token::RParen)?;
                func.check_arity(args.len())?;
                Ok(Expr::Call(func, args))
            }
            other => Err(FormulaError::Syntax(format!("예상하지 못한 토큰 {other:?}"))),
        }
    }

    fn arguments(&mut self) -> Result<Vec<Expr>, FormulaError> {
        let mut args = Vec::new();
        if self.peek() == Some(&Token::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.ternary()?);
            if self.peek() == Some(&Token::Comma) {
                self.pos += 1;
            } else {
                return Ok(args);
            }
        }
    }
}

fn truthy(v: f64) -> bool {
    v != 0.0
}

fn flag(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

impl Expr {
    fn eval(&self, vars: &HashMap<String, f64>) -> Result<f64, FormulaError> {
        let value = match self {
            Expr::Number(v) => *v,
            Expr::Var(name) => *vars
                .get(name)
                .ok_or_else(|| FormulaError::UnknownVariable(name.clone()))?,
            Expr::Neg(e) => -e.eval(vars)?,
            Expr::Not(e) => flag(!truthy(e.eval(vars)?)),
            Expr::Binary(op, a, b) => {
                let (a, b) = (a.eval(vars)?, b.eval(vars)?);
                match op {
                    BinOp::Add => a + b,
                    BinOp::Sub => a - b,
                    BinOp::Mul => a * b,
                    BinOp::Div if b == 0.0 => return Err(FormulaError::DivisionByZero),
                    BinOp::Div => a / b,
                }
            }
            Expr::Compare(first, rest) => {
                let mut lhs = first.eval(vars)?;
                for (op, e) in rest {
                    let rhs = e.eval(vars)?;
                    if !op.apply(lhs, rhs) {
                        return Ok(0.0);
                    }
                    lhs = rhs;
                }
                1.0
            }
            // 파이썬처럼 단락 평가하고 피연산자 값을 그대로 돌려준다
            Expr::And(a, b) => {
                let a = a.eval(vars)?;
                if truthy(a) {
                    b.eval(vars)?
                } else {
                    a
                }
            }
            Expr::Or(a, b) => {
                let a = a.eval(vars)?;
                if truthy(a) {
                    a
                } else {
                    b.eval(vars)?
                }
            }
            Expr::IfElse(then, cond, otherwise) => {
                if truthy(cond.eval(vars)?) {
                    then.eval(vars)?
                } else {
                    otherwise.eval(vars)?
                }
            }
            Expr::Call(func, args) => {
                let values = args
                    .iter()
                    .map(|a| a.eval(vars))
                    .collect::<Result<Vec<_>, _>>()?;
                match func {
                    Func::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
                    Func::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                    Func::Abs => values[0].abs(),
                    Func::Round => {
                        let digits = values.get(1).copied().unwrap_or(0.0).trunc();
                        round_to(values[0], digits as i32)
                    }
                }
            }
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(FormulaError::NonFinite)
        }
    }

    fn collect_vars(&self, out: &mut BTreeSet<String>) {
        match self {
            Expr::Number(_) => {}
            Expr::Var(name) => {
                out.insert(name.clone());
            }
            Expr::Neg(e) | Expr::Not(e) => e.collect_vars(out),
            Expr::Binary(_, a, b) | Expr::And(a, b) | Expr::Or(a, b) => {
                a.collect_vars(out);
                b.collect_vars(out);
            }
            Expr::Compare(first, rest) => {
                first.collect_vars(out);
                rest.iter().for_each(|(_, e)| e.collect_vars(out));
            }
            Expr::IfElse(a, b, c) => {
                a.collect_vars(out);
                b.collect_vars(out);
                c.collect_vars(out);
            }
            Expr::Call(_, args) => args.iter().for_each(|e| e.collect_vars(out)),
        }
    }
}

fn round_to(value: f64, digits: i32) -> f64 {
    let scale = 10_f64.powi(digits);
    if scale == 0.0 {
        // 자릿수가 값의 크기를 넘는 음수
        return 0.0;
    }
    let scaled = value * scale;
    if !scaled.is_finite() {
        // 자릿수가 충분히 크면 반올림할 소수부가 없다
        return value;
    }
    scaled.round() / scale
}

/// 파싱된 수식.
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    source: String,
    expr: Expr,
}

impl Formula {
    pub fn parse(source: &str) -> Result<Self, FormulaError> {
        let tokens = tokenize(source)?;
        if tokens.len() > MAX_TOKENS {
            return Err(FormulaError::Syntax(format!(
                "수식이 너무 깁니다 (토큰 {}개, 최대 {MAX_TOKENS}개)",
                tokens.len()
            )));
        }
        let mut parser = Parser {
            tokens,
            pos: 0,
            depth: 0,
        };
        let expr = parser.ternary()?;
        if let Some(token) = parser.peek() {
            return Err(FormulaError::Syntax(format!("수식 끝에 남은 토큰 {token:?}")));
        }
        Ok(Self {
            source: source.to_string(),
            expr,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn evaluate(&self, vars: &HashMap<String, f64>) -> Result<f64, FormulaError> {
        self.expr.eval(vars)
    }

    /// 수식이 참조하는 변수 이름 (정렬됨).
    pub fn variables(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.expr.collect_vars(&mut out);
        out
    }
}

/// 데이터 분류 이름 → 수식 변수 이름 (소문자, 공백은 `_`).
pub fn variable_name(category: &str) -> String {
    category.trim().to_lowercase().replace(' ', "_")
}

/// 저장된 계산 정의.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataCalculation {
    pub name: String,
    pub description: String,
    pub formula: String,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
}

fn active_by_default() -> bool {
    true
}

impl DataCalculation {
    pub fn new(name: &str, description: &str, formula: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            formula: formula.to_string(),
            is_active: true,
        }
    }

    /// 분류별 값으로 점수를 계산해 소수 둘째 자리로 반올림한다.
    /// 입력이 없거나 평가에 실패하면 `None`.
    pub fn calculate_score<'a, I>(&self, entries: I) -> Option<f64>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let vars: HashMap<String, f64> = entries
            .into_iter()
            .map(|(category, value)| (variable_name(category), value))
            .collect();
        if vars.is_empty() {
            return None;
        }
        match Formula::parse(&self.formula).and_then(|f| f.evaluate(&vars)) {
            Ok(value) => Some(round_to(value, 2)),
            Err(err) => {
                warn!("{} 계산 실패: {err}", self.name);
                None
            }
        }
    }
}

/// 기본 제공 계산식.
pub fn default_calculations() -> Vec<DataCalculation> {
    vec![
        DataCalculation::new(
            "Efficiency Score",
            "Overall efficiency based on multiple parameters",
            "min(100, (temperature * 0.3 + pressure * 0.4 + flow_rate * 0.3))",
        ),
        DataCalculation::new(
            "Performance Index",
            "Performance indicator based on operational data",
            "max(0, (output / input) * 100) if input > 0 else 0",
        ),
        DataCalculation::new(
            "Quality Score",
            "Quality assessment based on defect rates",
            "max(0, 100 - (defects / total_units * 100))",
        ),
    ]
}
