//! # OpenAPI YAML 生成ツール
//!
//! History API の OpenAPI 仕様を YAML 形式で標準出力に出力する。
//! 生成後、どの操作からも参照されていないコンポーネントスキーマを除去する。
//!
//! ## 使い方
//!
//! ```bash
//! cargo run --bin generate-openapi -p rirekiflow-history-api > openapi/openapi.yaml
//! ```

use std::collections::HashSet;

use rirekiflow_history_api::openapi::ApiDoc;
use serde_json::Value;

fn main() {
   let mut openapi = ApiDoc::openapi();
   remove_unused_schemas(&mut openapi);
   let yaml = openapi.to_yaml().expect("OpenAPI YAML 生成に失敗しました");
   print!("{yaml}");
}

/// どこからも `$ref` されていないコンポーネントスキーマを除去する
///
/// スキーマはビルダーで明示的に登録するため、ルート表を変更すると
/// 参照元を失った登録だけが残ることがある。ドキュメントツリーを走査して
/// 実際に参照されているスキーマ名を集め、それ以外を捨てる。
fn remove_unused_schemas(openapi: &mut utoipa::openapi::OpenApi) {
   let doc = serde_json::to_value(&*openapi).expect("OpenAPI の JSON 変換に失敗しました");

   let mut used = HashSet::new();
   collect_schema_refs(&doc, &mut used);

   if let Some(components) = &mut openapi.components {
      components.schemas.retain(|name, _| used.contains(name));
   }
}

/// JSON ツリーを再帰的に辿り、`#/components/schemas/` への参照先名を収集する
fn collect_schema_refs(value: &Value, used: &mut HashSet<String>) {
   match value {
      Value::Object(map) => {
         if let Some(Value::String(target)) = map.get("$ref")
            && let Some(name) = target.strip_prefix("#/components/schemas/")
         {
            used.insert(name.to_owned());
         }
         for nested in map.values() {
            collect_schema_refs(nested, used);
         }
      }
      Value::Array(items) => {
         for item in items {
            collect_schema_refs(item, used);
         }
      }
      _ => {}
   }
}
