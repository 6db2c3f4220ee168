use base::{Tensor, TensorError, tensor::element_count};

#[test]
fn test_tensor_new_valid() {
    let tensor = Tensor::new(vec![2, 3], vec![0i32, 1, 2, 3, 4, 5]).unwrap();
    assert_eq!(tensor.shape, vec![2, 3]);
    assert_eq!(tensor.len(), 6);
}

#[test]
fn test_tensor_new_shape_mismatch() {
    let result = Tensor::new(vec![2, 3], vec![0i32; 5]);
    assert_eq!(
        result.err(),
        Some(TensorError::ShapeMismatch {
            expected: 6,
            got: 5
        })
    );
}

#[test]
fn test_tensor_new_overflow() {
    let result = Tensor::<i32>::new(vec![usize::MAX, 2], vec![]);
    assert!(matches!(result, Err(TensorError::ShapeOverflow)));
}

#[test]
fn test_tensor_zero_dimension_is_empty() {
    let tensor = Tensor::<i32>::new(vec![0, 4], vec![]).unwrap();
    assert!(tensor.is_empty());
    assert_eq!(tensor.shape, vec![0, 4]);
}

#[test]
fn test_element_count_scalar_shape() {
    assert_eq!(element_count(&[]), Ok(1));
    assert_eq!(element_count(&[4, 5, 1]), Ok(20));
}

#[test]
fn test_tensor_error_display() {
    let err = TensorError::ShapeMismatch {
        expected: 4,
        got: 3,
    };
    assert_eq!(err.to_string(), "shape mismatch: expected 4 elements, got 3");
}
