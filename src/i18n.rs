use std::collections::HashMap;
use std::fs;
use std::path::Path;

use sys_locale::get_locale;

/// 문자열 키를 모아두는 네임스페이스.
pub mod keys {
    pub const ERROR_PREFIX: &str = "general.error_prefix";
    pub const APP_EXIT: &str = "general.app_exit";

    pub const MAIN_MENU_TITLE: &str = "main_menu.title";
    pub const MAIN_MENU_COOLING: &str = "main_menu.cooling";
    pub const MAIN_MENU_BOILER: &str = "main_menu.boiler";
    pub const MAIN_MENU_TREND: &str = "main_menu.trend";
    pub const MAIN_MENU_FORMULA: &str = "main_menu.formula";
    pub const MAIN_MENU_EXIT: &str = "main_menu.exit";
    pub const PROMPT_MENU_SELECT: &str = "prompt.menu_select";
    pub const INVALID_SELECTION_RETRY: &str = "error.invalid_selection_retry";
    pub const ERROR_INVALID_NUMBER: &str = "error.invalid_number";
    pub const PROMPT_OPTIONAL_HINT: &str = "prompt.optional_hint";

    pub const COOLING_HEADING: &str = "cooling.heading";
    pub const BOILER_HEADING: &str = "boiler.heading";

    pub const REPORT_HEADING: &str = "report.heading";
    pub const REPORT_INDICES: &str = "report.indices";
    pub const REPORT_NOT_COMPUTED: &str = "report.not_computed";
    pub const REPORT_SCORE: &str = "report.score";
    pub const REPORT_OVERALL: &str = "report.overall";
    pub const REPORT_NOTHING_COMPUTABLE: &str = "report.nothing_computable";
    pub const REPORT_DEDUCTIONS: &str = "report.deductions";
    pub const REPORT_COMPLIANCE: &str = "report.compliance";
    pub const REPORT_RECOMMENDATIONS: &str = "report.recommendations";
    pub const REPORT_ISSUES: &str = "report.issues";

    pub const TREND_HEADING: &str = "trend.heading";
    pub const TREND_PROMPT_PARAM: &str = "trend.prompt_param";
    pub const TREND_PROMPT_VALUES: &str = "trend.prompt_values";
    pub const TREND_PROMPT_MIN: &str = "trend.prompt_min";
    pub const TREND_PROMPT_MAX: &str = "trend.prompt_max";
    pub const TREND_NO_VALUES: &str = "trend.no_values";
    pub const TREND_LAST_STATUS: &str = "trend.last_status";

    pub const FORMULA_HEADING: &str = "formula.heading";
    pub const FORMULA_PROMPT_EXPR: &str = "formula.prompt_expr";
    pub const FORMULA_PROMPT_VAR: &str = "formula.prompt_var";
    pub const FORMULA_RESULT: &str = "formula.result";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Language {
    Ko,
    En,
}

impl Language {
    fn from_code(code: &str) -> Self {
        match language_code(code) {
            Some("en") => Language::En,
            _ => Language::Ko,
        }
    }
}

/// 런타임 언어 번들을 제공한다.
#[derive(Debug, Clone)]
pub struct Translator {
    lang: Language,
    pack: Option<HashMap<String, String>>,
}

impl Translator {
    /// 언어 코드(ko/en)에 따라 번역기를 생성한다. 알 수 없는 코드는 ko로 폴백한다.
    pub fn new(lang_code: &str) -> Self {
        Self::new_with_pack(lang_code, None)
    }

    /// 언어팩 디렉터리의 `<언어>.toml`이 있으면 내장 문자열보다 우선한다.
    pub fn new_with_pack(lang_code: &str, pack_dir: Option<&str>) -> Self {
        let lang = Language::from_code(lang_code);
        let pack = pack_dir.and_then(|dir| load_pack(Path::new(dir), lang));
        Self { lang, pack }
    }

    /// 언어팩 → 내장 문자열 순. 영어 문자열이 없으면 한국어를 쓴다.
    pub fn t<'a>(&'a self, key: &str) -> &'a str {
        if let Some(v) = self.pack.as_ref().and_then(|m| m.get(key)) {
            return v;
        }
        match self.lang {
            Language::En => en(key).unwrap_or_else(|| ko(key)),
            Language::Ko => ko(key),
        }
    }
}

/// CLI 플래그, 설정, 시스템 로케일 순으로 언어 코드를 결정한다. 모두 없으면 ko.
pub fn resolve_language(cli_arg: &str, config_lang: Option<&str>) -> String {
    language_code(cli_arg)
        .or_else(|| config_lang.and_then(language_code))
        .map(str::to_string)
        .or_else(detect_system_language)
        .unwrap_or_else(|| "ko".to_string())
}

/// `ko_KR.UTF-8`, `en-US`, `EN` 같은 표기에서 지원 언어 코드를 뽑는다.
/// `auto`와 지원하지 않는 언어는 `None`.
fn language_code(raw: &str) -> Option<&'static str> {
    let primary = raw.trim().split(['.', '_', '-']).next()?.to_ascii_lowercase();
    match primary.as_str() {
        "ko" | "kor" | "korean" => Some("ko"),
        "en" | "eng" | "english" => Some("en"),
        _ => None,
    }
}

/// 시스템 로케일, 그다음 `LC_ALL`/`LANG` 환경 변수에서 언어를 추정한다.
pub fn detect_system_language() -> Option<String> {
    get_locale()
        .into_iter()
        .chain(["LC_ALL", "LANG"].iter().filter_map(|var| std::env::var(var).ok()))
        .find_map(|locale| language_code(&locale))
        .map(str::to_string)
}

fn load_pack(dir: &Path, lang: Language) -> Option<HashMap<String, String>> {
    let file = match lang {
        Language::Ko => "ko.toml",
        Language::En => "en.toml",
    };
    let content = fs::read_to_string(dir.join(file)).ok()?;
    flatten_pack(&content)
}

/// `[report] score = "..."`를 `report.score` 키로 펼친다. 문자열이 아닌 값은 무시한다.
fn flatten_pack(src: &str) -> Option<HashMap<String, String>> {
    let table: toml::Table = toml::from_str(src).ok()?;
    let mut map = HashMap::new();
    let mut pending: Vec<(String, toml::Value)> = table.into_iter().collect();
    while let Some((key, value)) = pending.pop() {
        match value {
            toml::Value::String(s) => {
                map.insert(key, s);
            }
            toml::Value::Table(t) => {
                pending.extend(t.into_iter().map(|(k, v)| (format!("{key}.{k}"), v)));
            }
            _ => {}
        }
    }
    (!map.is_empty()).then_some(map)
}

fn ko(key: &str) -> &'static str {
    use keys::*;
    match key {
        ERROR_PREFIX => "오류",
        APP_EXIT => "프로그램을 종료합니다.",
        MAIN_MENU_TITLE => "\n=== Water Stability Toolbox ===",
        MAIN_MENU_COOLING => "1) 냉각수 분석 (LSI/RSI/PSI/LR)",
        MAIN_MENU_BOILER => "2) 보일러수 분석",
        MAIN_MENU_TREND => "3) 추세 분석",
        MAIN_MENU_FORMULA => "4) 계산식 평가",
        MAIN_MENU_EXIT => "0) 종료",
        PROMPT_MENU_SELECT => "메뉴 선택: ",
        INVALID_SELECTION_RETRY => "잘못된 입력입니다. 다시 선택하세요.",
        ERROR_INVALID_NUMBER => "숫자를 입력하세요.",
        PROMPT_OPTIONAL_HINT => "(빈칸 = 미측정)",
        COOLING_HEADING => "\n-- 냉각수 분석 --",
        BOILER_HEADING => "\n-- 보일러수 분석 --",
        REPORT_HEADING => "\n== 분석 결과 ==",
        REPORT_INDICES => "지수",
        REPORT_NOT_COMPUTED => "계산 불가",
        REPORT_SCORE => "안정성 점수",
        REPORT_OVERALL => "종합 판정",
        REPORT_NOTHING_COMPUTABLE => "계산 가능한 지수가 없습니다.",
        REPORT_DEDUCTIONS => "감점 내역",
        REPORT_COMPLIANCE => "목표 범위 점검",
        REPORT_RECOMMENDATIONS => "권고사항",
        REPORT_ISSUES => "입력 문제",
        TREND_HEADING => "\n-- 추세 분석 --",
        TREND_PROMPT_PARAM => "파라미터 이름 (ph, tds, lsi, rsi, lr ...): ",
        TREND_PROMPT_VALUES => "측정값 (쉼표로 구분): ",
        TREND_PROMPT_MIN => "목표 하한 ",
        TREND_PROMPT_MAX => "목표 상한 ",
        TREND_NO_VALUES => "유효한 측정값이 없습니다.",
        TREND_LAST_STATUS => "마지막 값 상태",
        FORMULA_HEADING => "\n-- 계산식 평가 --",
        FORMULA_PROMPT_EXPR => "계산식: ",
        FORMULA_PROMPT_VAR => "변수 값",
        FORMULA_RESULT => "결과",
        _ => "[missing translation]",
    }
}

fn en(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        ERROR_PREFIX => "Error",
        APP_EXIT => "Exiting.",
        MAIN_MENU_COOLING => "1) Cooling water analysis (LSI/RSI/PSI/LR)",
        MAIN_MENU_BOILER => "2) Boiler water analysis",
        MAIN_MENU_TREND => "3) Trend analysis",
        MAIN_MENU_FORMULA => "4) Evaluate formula",
        MAIN_MENU_EXIT => "0) Exit",
        PROMPT_MENU_SELECT => "Select menu: ",
        INVALID_SELECTION_RETRY => "Invalid input. Please select again.",
        ERROR_INVALID_NUMBER => "Please enter a number.",
        PROMPT_OPTIONAL_HINT => "(blank = not measured)",
        COOLING_HEADING => "\n-- Cooling Water Analysis --",
        BOILER_HEADING => "\n-- Boiler Water Analysis --",
        REPORT_HEADING => "\n== Analysis Result ==",
        REPORT_INDICES => "Indices",
        REPORT_NOT_COMPUTED => "not computable",
        REPORT_SCORE => "Stability score",
        REPORT_OVERALL => "Overall status",
        REPORT_NOTHING_COMPUTABLE => "No index could be computed.",
        REPORT_DEDUCTIONS => "Deductions",
        REPORT_COMPLIANCE => "Target range check",
        REPORT_RECOMMENDATIONS => "Recommendations",
        REPORT_ISSUES => "Input issues",
        TREND_HEADING => "\n-- Trend Analysis --",
        TREND_PROMPT_PARAM => "Parameter name (ph, tds, lsi, rsi, lr ...): ",
        TREND_PROMPT_VALUES => "Values (comma separated): ",
        TREND_PROMPT_MIN => "Target minimum ",
        TREND_PROMPT_MAX => "Target maximum ",
        TREND_NO_VALUES => "No valid values.",
        TREND_LAST_STATUS => "Latest value status",
        FORMULA_HEADING => "\n-- Formula Evaluation --",
        FORMULA_PROMPT_EXPR => "Formula: ",
        FORMULA_PROMPT_VAR => "Variable value",
        FORMULA_RESULT => "Result",
        _ => return None,
    })
}
