//! フィールドパス
//!
//! ネストした属性の位置を `rules[2].priority` の形式で表します。
//! バリデーションエラーはすべてこのパスを持ち、どの入力が問題だったかを
//! 呼び出し側へ正確に伝えます。

use std::fmt;

/// パスの1区切り
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// フィールド名
    Field(String),
    /// リストの添字
    Index(usize),
}

/// 属性ツリー内の位置
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldPath(Vec<Segment>);

impl FieldPath {
    /// ルート（属性マップ全体）を指すパス
    pub fn root() -> Self {
        Self::default()
    }

    /// トップレベルのフィールドを指すパス
    pub fn field(name: impl Into<String>) -> Self {
        Self(vec![Segment::Field(name.into())])
    }

    /// 子フィールドへ降りたパスを返す
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(Segment::Field(name.into()));
        Self(segments)
    }

    /// リスト要素へ降りたパスを返す
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(Segment::Index(index));
        Self(segments)
    }

    /// ルートかどうか
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "(root)");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                Segment::Field(name) => {
                    if i > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{name}")?;
                }
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_display() {
        assert_eq!(FieldPath::root().to_string(), "(root)");
        assert!(FieldPath::root().is_root());
    }

    #[test]
    fn test_field_display() {
        assert_eq!(FieldPath::field("size").to_string(), "size");
    }

    #[test]
    fn test_nested_display() {
        let path = FieldPath::field("public_net").child("enable_ipv4");
        assert_eq!(path.to_string(), "public_net.enable_ipv4");
    }

    #[test]
    fn test_list_index_display() {
        let path = FieldPath::field("rules").index(2).child("priority");
        assert_eq!(path.to_string(), "rules[2].priority");
    }

    #[test]
    fn test_map_entry_display() {
        let path = FieldPath::field("labels").child("env");
        assert_eq!(path.to_string(), "labels.env");
    }
}
