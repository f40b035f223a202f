//! # History API ライブラリ
//!
//! BPM エンジンの履歴データを公開する REST アダプタのコアモジュール。
//! バイナリ（`main.rs`）は設定読み込みと依存の接続だけを行い、
//! ルーター組み立て以降はすべてこちら側に置く。
//!
//! - `app_builder`: DI とルートテーブルの構築
//! - `config`: 環境変数からの設定読み込み
//! - `dev_auth`: 開発用の固定セッション投入（`dev-auth` フィーチャ時のみ）
//! - `error`: 認証・認可・エラーレスポンス変換
//! - `handler`: HTTP ハンドラ（ディスパッチャ）
//! - `middleware`: Request ID の伝播とキャッシュ抑止
//! - `openapi`: OpenAPI ドキュメント（ビルダーで構築）
//! - `provider`: BPM エンジン履歴プロバイダ

pub mod app_builder;
pub mod config;
#[cfg(feature = "dev-auth")]
pub mod dev_auth;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod openapi;
pub mod provider;
