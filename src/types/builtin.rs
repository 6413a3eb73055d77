//! Descriptors for std and serde_json types

use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, LinkedList, VecDeque};
use std::rc::Rc;
use std::sync::mpsc::{Receiver, Sender, SyncSender};
use std::sync::{Arc, Mutex, RwLock};

use super::{Kind, Reflect, TypeInfo};

macro_rules! reflect_scalar {
    ($kind:ident => $($t:ty),+ $(,)?) => {
        $(
            impl Reflect for $t {
                fn type_info() -> TypeInfo {
                    TypeInfo::new::<Self>(Kind::$kind)
                }
            }
        )+
    };
}

reflect_scalar!(Bool => bool);
reflect_scalar!(Integer => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
reflect_scalar!(Number => f32, f64);
reflect_scalar!(String => String, str, char);
reflect_scalar!(Null => ());
reflect_scalar!(Any => serde_json::Value);

impl Reflect for Cow<'static, str> {
    fn type_info() -> TypeInfo {
        String::type_info()
    }
}

impl<T: Reflect> Reflect for Option<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::new::<Self>(Kind::Optional(T::type_info))
    }
}

// Indirection is stripped: the pointee's descriptor (and identity) is used.
macro_rules! reflect_transparent {
    ($($wrapper:ident),+ $(,)?) => {
        $(
            impl<T: Reflect + ?Sized> Reflect for $wrapper<T> {
                fn type_info() -> TypeInfo {
                    T::type_info()
                }
            }
        )+
    };
}

reflect_transparent!(Box, Rc, Arc, RefCell, Mutex, RwLock);

impl<T: Reflect + ?Sized> Reflect for &'static T {
    fn type_info() -> TypeInfo {
        T::type_info()
    }
}

macro_rules! reflect_sequence {
    ($unique:expr => $($seq:ident),+ $(,)?) => {
        $(
            impl<T: Reflect> Reflect for $seq<T> {
                fn type_info() -> TypeInfo {
                    TypeInfo::new::<Self>(Kind::Sequence {
                        items: T::type_info,
                        unique: $unique,
                        len: None,
                    })
                }
            }
        )+
    };
}

reflect_sequence!(false => Vec, VecDeque, LinkedList);
reflect_sequence!(true => HashSet, BTreeSet);

impl<T: Reflect> Reflect for [T] {
    fn type_info() -> TypeInfo {
        TypeInfo::new::<Self>(Kind::Sequence {
            items: T::type_info,
            unique: false,
            len: None,
        })
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn type_info() -> TypeInfo {
        TypeInfo::new::<Self>(Kind::Sequence {
            items: T::type_info,
            unique: false,
            len: Some(N),
        })
    }
}

impl<K: 'static, V: Reflect> Reflect for HashMap<K, V> {
    fn type_info() -> TypeInfo {
        TypeInfo::new::<Self>(Kind::Map { values: V::type_info })
    }
}

impl<K: 'static, V: Reflect> Reflect for BTreeMap<K, V> {
    fn type_info() -> TypeInfo {
        TypeInfo::new::<Self>(Kind::Map { values: V::type_info })
    }
}

impl Reflect for serde_json::Map<String, serde_json::Value> {
    fn type_info() -> TypeInfo {
        TypeInfo::new::<Self>(Kind::Map {
            values: serde_json::Value::type_info,
        })
    }
}

macro_rules! reflect_unsupported {
    ($what:literal => $($t:ty),+ $(,)?) => {
        $(
            impl<T: 'static> Reflect for $t {
                fn type_info() -> TypeInfo {
                    TypeInfo::new::<Self>(Kind::Unsupported($what))
                }
            }
        )+
    };
}

reflect_unsupported!("channel" => Sender<T>, SyncSender<T>, Receiver<T>);

impl<R: 'static> Reflect for fn() -> R {
    fn type_info() -> TypeInfo {
        TypeInfo::new::<Self>(Kind::Unsupported("function"))
    }
}

impl<A: 'static, R: 'static> Reflect for fn(A) -> R {
    fn type_info() -> TypeInfo {
        TypeInfo::new::<Self>(Kind::Unsupported("function"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeKey;

    #[test]
    fn test_scalars_are_anonymous() {
        for info in [
            TypeInfo::of::<bool>(),
            TypeInfo::of::<u64>(),
            TypeInfo::of::<f32>(),
            TypeInfo::of::<String>(),
        ] {
            assert!(!info.is_named(), "{:?} should be anonymous", info);
        }
        assert!(matches!(TypeInfo::of::<i32>().kind(), Kind::Integer));
        assert!(matches!(TypeInfo::of::<char>().kind(), Kind::String));
        assert!(matches!(TypeInfo::of::<serde_json::Value>().kind(), Kind::Any));
    }

    #[test]
    fn test_sequences() {
        match TypeInfo::of::<BTreeSet<String>>().kind() {
            Kind::Sequence { unique, len, items } => {
                assert!(*unique);
                assert_eq!(*len, None);
                assert_eq!(items().key(), TypeKey::of::<String>());
            }
            other => panic!("Expected Sequence, got {:?}", other),
        }
        match TypeInfo::of::<[u8; 4]>().kind() {
            Kind::Sequence { len, .. } => assert_eq!(*len, Some(4)),
            other => panic!("Expected Sequence, got {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_kinds() {
        assert!(matches!(
            TypeInfo::of::<Sender<u8>>().kind(),
            Kind::Unsupported("channel")
        ));
        assert!(matches!(
            TypeInfo::of::<fn(u8) -> bool>().kind(),
            Kind::Unsupported("function")
        ));
    }
}
