//! 수질 안정성 계산 엔진 모듈 모음.
//! 입력 검증 → 냉각수 지수/보일러 점수 → 상태 분류 → 안정성 점수 → 권고사항 순으로 흐른다.

pub mod boiler;
pub mod compliance;
pub mod engine;
pub mod error;
pub mod indices;
pub mod reading;
pub mod recommend;
pub mod score;
pub mod status;
pub mod targets;
pub mod trend;
pub mod validate;

pub use engine::{compute, compute_with_defaults, CalculationRequest, CalculationResult};
pub use error::{CalculationError, InputIssue, IssueKind};
pub use reading::{AnalysisType, BoilerParameters, CoolingParameters, Gated, Parameter, WaterReading};
pub use recommend::{Priority, Recommendation, RecommendationPolicy, RecommendationType};
pub use status::{LrStatus, LsiStatus, OverallStatus, PsiStatus, RsiStatus, Tier};
pub use targets::{Bounds, BoilerTargets, CoolingTargets, ParameterTarget, TargetOverride, TargetRangeConfig};
