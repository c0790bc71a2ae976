//! tcpgate
//!
//! 上流サービスのTCPポートが接続可能になるまで待機し、
//! 依存プロセスの起動をゲートする。

#![warn(missing_docs)]

/// エラー型定義
pub mod error;

/// 待機対象エンドポイント
pub mod endpoint;

/// 環境変数からのエンドポイント検出
pub mod discovery;

/// 設定管理（待機設定・環境変数ヘルパー）
pub mod config;

/// ロギング初期化ユーティリティ
pub mod logging;

/// 共有キャンセルシグナル
pub mod signal;

/// デッドラインタイマー
pub mod deadline;

/// エンドポイントプローバー（TCP接続リトライループ）
pub mod prober;

/// 待機コーディネーター
pub mod coordinator;

/// CLIインターフェース
pub mod cli;

pub use coordinator::{wait_for_endpoints, Coordinator, RunOutcome, RunSummary};
pub use endpoint::Endpoint;
